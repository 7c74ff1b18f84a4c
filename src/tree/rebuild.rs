//! Rebuild a whole forest from one flat directory listing plus one flat test
//! listing, inferring parentage from the slash-delimited ids.

use std::collections::HashMap;

use crate::model::{DirectoryNode, TestDateMetricData};

use super::node::{build_path_node, build_test_node};
use super::{parent_id, Node, OnExpand, ROOT_ID};

type Groups = HashMap<String, Vec<Node>>;

/// Roots are exactly the nodes grouped under `ROOT_ID`. Every Path node that
/// has a group gets those rows and `loaded = true`; the rest stay unloaded.
pub fn rebuild_roots(
  nodes: Vec<DirectoryNode>,
  tests: Vec<TestDateMetricData>,
  on_expand: Option<&OnExpand>,
) -> Vec<Node> {
  let mut groups: Groups = HashMap::new();

  for record in &nodes {
    let parent = parent_id(&record.id);
    // "/" is the implicit root; it never becomes its own child. A forest
    // merged under an explicit "/" node therefore rebuilds with that node's
    // children as roots.
    if parent == record.id {
      continue;
    }
    groups
      .entry(parent)
      .or_default()
      .push(Node::Path(build_path_node(record, on_expand.cloned())));
  }

  for record in &tests {
    groups
      .entry(record.file_name.clone())
      .or_default()
      .push(Node::Test(build_test_node(record)));
  }

  let roots = groups.remove(ROOT_ID).unwrap_or_default();
  roots.into_iter().map(|node| attach(node, &mut groups)).collect()
}

fn attach(node: Node, groups: &mut Groups) -> Node {
  let Node::Path(mut path) = node else {
    return node;
  };

  // Each group is consumed once, so repeated ids cannot duplicate subtrees.
  if let Some(children) = groups.remove(&path.id) {
    path.rows = children.into_iter().map(|child| attach(child, groups)).collect();
    path.loaded = true;
  }

  Node::Path(path)
}
