// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: In-memory forest of directory/file/test/variant nodes that is built incrementally from paged backend responses
// role: model/tree
// outputs: Node (tagged union), Forest (roots + revision), parent id derivation
// invariants:
// - strict tree: every non-root node is owned by exactly one parent's rows
// - PathNode.loaded == false ⇒ rows is empty
// - every reducer call yields a Forest with a strictly larger revision
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod collect;
pub mod node;
pub mod rebuild;
pub mod reducer;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::metrics::MetricsMap;

pub use collect::{get_loaded_parent_ids, LoadedParents};
pub use reducer::{reduce, Action};

/// Identifier of the conceptual root directory.
pub const ROOT_ID: &str = "/";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathKind {
  Directory,
  Filename,
}

/// What the owner of a forest should fetch to fill in a node's children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandRequest {
  Directory { parent_id: String },
  Tests { file_id: String, pages: usize },
}

type ExpandFn = dyn Fn(&PathNode) -> ExpandRequest + Send + Sync;

/// Loader callback bound to a Path node when it is created.
#[derive(Clone)]
pub struct OnExpand(Arc<ExpandFn>);

impl OnExpand {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&PathNode) -> ExpandRequest + Send + Sync + 'static,
  {
    Self(Arc::new(f))
  }

  /// Request the node's children, or None once they have been loaded.
  pub fn invoke(&self, node: &PathNode) -> Option<ExpandRequest> {
    if node.loaded {
      return None;
    }
    Some((self.0)(node))
  }
}

impl fmt::Debug for OnExpand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("OnExpand(..)")
  }
}

/// "See more" affordance left under a file whose test list is paged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMore {
  pub file_id: String,
  pub pages_loaded: usize,
}

/// A directory or a source file.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
  pub id: String,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subname: Option<String>,
  pub path: String,
  #[serde(rename = "type")]
  pub kind: PathKind,
  pub loaded: bool,
  pub is_expandable: bool,
  pub metrics: MetricsMap,
  pub rows: Vec<Node>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub footer: Option<LoadMore>,
  #[serde(skip)]
  pub on_expand: Option<OnExpand>,
}

/// A named test; its rows are the variants it ran under.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNode {
  pub id: String,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subname: Option<String>,
  pub file_name: String,
  pub is_expandable: bool,
  pub metrics: MetricsMap,
  pub rows: Vec<Node>,
}

/// One (suite, builder, bucket) configuration of a test. Always a leaf.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVariantNode {
  pub id: String,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subname: Option<String>,
  pub suite: String,
  pub builder: String,
  pub bucket: String,
  pub metrics: MetricsMap,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
  Path(PathNode),
  Test(TestNode),
  Variant(TestVariantNode),
}

impl Node {
  pub fn id(&self) -> &str {
    match self {
      Node::Path(p) => &p.id,
      Node::Test(t) => &t.id,
      Node::Variant(v) => &v.id,
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Node::Path(p) => &p.name,
      Node::Test(t) => &t.name,
      Node::Variant(v) => &v.name,
    }
  }

  pub fn subname(&self) -> Option<&str> {
    match self {
      Node::Path(p) => p.subname.as_deref(),
      Node::Test(t) => t.subname.as_deref(),
      Node::Variant(v) => v.subname.as_deref(),
    }
  }

  pub fn metrics(&self) -> &MetricsMap {
    match self {
      Node::Path(p) => &p.metrics,
      Node::Test(t) => &t.metrics,
      Node::Variant(v) => &v.metrics,
    }
  }

  pub fn rows(&self) -> &[Node] {
    match self {
      Node::Path(p) => &p.rows,
      Node::Test(t) => &t.rows,
      Node::Variant(_) => &[],
    }
  }

  pub fn is_expandable(&self) -> bool {
    match self {
      Node::Path(p) => p.is_expandable,
      Node::Test(t) => t.is_expandable,
      Node::Variant(_) => false,
    }
  }

  pub fn as_path(&self) -> Option<&PathNode> {
    match self {
      Node::Path(p) => Some(p),
      _ => None,
    }
  }
}

/// Ordered root nodes plus a revision counter for change detection.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Forest {
  roots: Vec<Node>,
  revision: u64,
}

impl Forest {
  pub fn roots(&self) -> &[Node] {
    &self.roots
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  pub fn len(&self) -> usize {
    self.roots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.roots.is_empty()
  }

  /// First Path node with `id`, searched depth-first in row order.
  pub fn find_path(&self, id: &str) -> Option<&PathNode> {
    find_path_in(&self.roots, id)
  }

  pub(crate) fn find_path_mut(&mut self, id: &str) -> Option<&mut PathNode> {
    find_path_in_mut(&mut self.roots, id)
  }

  pub(crate) fn into_parts(self) -> (Vec<Node>, u64) {
    (self.roots, self.revision)
  }

  pub(crate) fn from_parts(roots: Vec<Node>, revision: u64) -> Self {
    Self { roots, revision }
  }
}

fn find_path_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a PathNode> {
  for node in nodes {
    if let Node::Path(p) = node {
      if p.id == id {
        return Some(p);
      }
    }
    if let Some(found) = find_path_in(node.rows(), id) {
      return Some(found);
    }
  }
  None
}

fn find_path_in_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut PathNode> {
  for node in nodes.iter_mut() {
    match node {
      Node::Path(p) => {
        if p.id == id {
          return Some(p);
        }
        if let Some(found) = find_path_in_mut(&mut p.rows, id) {
          return Some(found);
        }
      }
      Node::Test(t) => {
        if let Some(found) = find_path_in_mut(&mut t.rows, id) {
          return Some(found);
        }
      }
      Node::Variant(_) => {}
    }
  }
  None
}

/// Parent of a slash-delimited id: drop the last segment.
///
/// An empty result maps to `ROOT_ID`, so `'/a'` and `'//chrome'` both live
/// under `'/'` (and `'/'` is its own parent).
pub fn parent_id(id: &str) -> String {
  let mut segments: Vec<&str> = id.split('/').collect();
  segments.pop();
  let joined = segments.join("/");

  if joined.is_empty() {
    ROOT_ID.to_string()
  } else {
    joined
  }
}
