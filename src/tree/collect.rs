//! Collect the ids of directories and files whose children are loaded, so a
//! parameter change can re-request exactly the subtrees the user had open.

use serde::Serialize;

use super::{Node, PathKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadedParents {
  pub directories: Vec<String>,
  pub files: Vec<String>,
}

/// Walk the forest pre-order (parent before children, siblings in order).
pub fn get_loaded_parent_ids(roots: &[Node]) -> LoadedParents {
  let mut out = LoadedParents::default();
  walk(roots, &mut out);
  out
}

fn walk(nodes: &[Node], out: &mut LoadedParents) {
  for node in nodes {
    if let Node::Path(path) = node {
      if path.loaded {
        match path.kind {
          PathKind::Directory => out.directories.push(path.id.clone()),
          PathKind::Filename => out.files.push(path.id.clone()),
        }
      }
    }
    // Descend regardless of the loaded flag.
    walk(node.rows(), out);
  }
}
