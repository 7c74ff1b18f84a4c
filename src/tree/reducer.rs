// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure (forest, action) → forest reducer that splices paged backend batches into the tree
// role: state/reducer
// inputs: Forest (consumed), Action
// outputs: New Forest with revision + 1
// invariants:
// - no parent id ⇒ the converted batch replaces every root
// - parent id ⇒ the first matching Path node gets rows replaced, loaded = true, footer replaced (None clears it)
// - unknown parent id ⇒ content unchanged, revision still advances
// - ClearDir ⇒ empty roots
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{DirectoryNode, TestDateMetricData};

use super::node::{path_nodes, test_nodes};
use super::rebuild::rebuild_roots;
use super::{Forest, LoadMore, Node, OnExpand};

#[derive(Debug, Clone)]
pub enum Action {
  MergeTest {
    tests: Vec<TestDateMetricData>,
    parent_id: Option<String>,
    footer: Option<LoadMore>,
  },
  MergeDir {
    nodes: Vec<DirectoryNode>,
    parent_id: Option<String>,
    on_expand: Option<OnExpand>,
  },
  RebuildState {
    nodes: Vec<DirectoryNode>,
    tests: Vec<TestDateMetricData>,
    on_expand: Option<OnExpand>,
  },
  ClearDir,
}

impl Action {
  pub fn name(&self) -> &'static str {
    match self {
      Action::MergeTest { .. } => "merge_test",
      Action::MergeDir { .. } => "merge_dir",
      Action::RebuildState { .. } => "rebuild_state",
      Action::ClearDir => "clear_dir",
    }
  }
}

/// Apply one action. The returned forest always carries a new revision.
pub fn reduce(forest: Forest, action: Action) -> Forest {
  let (mut roots, revision) = forest.into_parts();

  match action {
    Action::MergeTest {
      tests,
      parent_id,
      footer,
    } => {
      let rows = test_nodes(&tests);
      roots = splice(roots, revision, parent_id.as_deref(), rows, footer);
    }
    Action::MergeDir {
      nodes,
      parent_id,
      on_expand,
    } => {
      let rows = path_nodes(&nodes, on_expand.as_ref());
      roots = splice(roots, revision, parent_id.as_deref(), rows, None);
    }
    Action::RebuildState {
      nodes,
      tests,
      on_expand,
    } => {
      roots = rebuild_roots(nodes, tests, on_expand.as_ref());
    }
    Action::ClearDir => {
      roots = Vec::new();
    }
  }

  Forest::from_parts(roots, revision + 1)
}

fn splice(
  roots: Vec<Node>,
  revision: u64,
  parent_id: Option<&str>,
  rows: Vec<Node>,
  footer: Option<LoadMore>,
) -> Vec<Node> {
  let Some(parent_id) = parent_id else {
    return rows;
  };

  let mut forest = Forest::from_parts(roots, revision);

  if let Some(parent) = forest.find_path_mut(parent_id) {
    parent.rows = rows;
    parent.loaded = true;
    parent.footer = footer;
  } else {
    tracing::debug!(parent_id, "merge target not in forest; dropping batch");
  }

  forest.into_parts().0
}
