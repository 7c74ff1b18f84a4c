// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Own one forest and drive it: initial load, expand, see more, paging, parameter changes and rebuilds
// role: orchestration/view
// inputs: &dyn MetricsApi, QueryScope, Params
// outputs: Forest after each reducer dispatch; last_page flag for the flat view
// side_effects: Backend queries through the MetricsApi seam
// invariants:
// - every state change goes through tree::reduce; the forest is never edited in place here
// - the loading counter is incremented per request and decremented on success or failure; never negative
// - a rebuild dispatches exactly one RebuildState, only after both halves arrived; arrival order is irrelevant
// - any failed fetch leaves the forest as it was
// errors: Fetch failures propagate with the method and ids attached
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};

use crate::api::MetricsApi;
use crate::model::{DirectoryNode, TestDateMetricData};
use crate::params::{directory_request, test_request, Params, QueryScope};
use crate::tree::{
  get_loaded_parent_ids, reduce, Action, ExpandRequest, Forest, LoadMore, OnExpand, PathKind, PathNode, ROOT_ID,
};

/// Page size used to re-request every test under the files that were open.
pub const REBUILD_PAGE_SIZE: usize = 1000;

/// In-flight request counter behind the "loading" indicator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadingCounter {
  in_flight: usize,
}

impl LoadingCounter {
  pub fn start(&mut self) {
    self.in_flight += 1;
  }

  pub fn finish(&mut self) {
    self.in_flight = self.in_flight.saturating_sub(1);
  }

  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight > 0
  }
}

/// Joins the two halves of a rebuild. Whichever half arrives second
/// produces the single RebuildState action.
#[derive(Debug, Default)]
pub struct PendingRebuild {
  nodes: Option<Vec<DirectoryNode>>,
  tests: Option<Vec<TestDateMetricData>>,
  on_expand: Option<OnExpand>,
}

impl PendingRebuild {
  pub fn new(on_expand: Option<OnExpand>) -> Self {
    Self {
      nodes: None,
      tests: None,
      on_expand,
    }
  }

  /// No files were open: the test half is known to be empty up front.
  pub fn without_tests(mut self) -> Self {
    self.tests = Some(Vec::new());
    self
  }

  pub fn receive_nodes(&mut self, nodes: Vec<DirectoryNode>) -> Option<Action> {
    self.nodes = Some(nodes);
    self.complete()
  }

  pub fn receive_tests(&mut self, tests: Vec<TestDateMetricData>) -> Option<Action> {
    self.tests = Some(tests);
    self.complete()
  }

  fn complete(&mut self) -> Option<Action> {
    if self.nodes.is_none() || self.tests.is_none() {
      return None;
    }
    Some(Action::RebuildState {
      nodes: self.nodes.take().unwrap_or_default(),
      tests: self.tests.take().unwrap_or_default(),
      on_expand: self.on_expand.clone(),
    })
  }
}

/// Loader bound to every Path node the view creates.
pub fn default_loader() -> OnExpand {
  OnExpand::new(|node: &PathNode| match node.kind {
    PathKind::Directory => ExpandRequest::Directory {
      parent_id: node.id.clone(),
    },
    PathKind::Filename => ExpandRequest::Tests {
      file_id: node.id.clone(),
      pages: 1,
    },
  })
}

pub struct TreeView<'a> {
  api: &'a dyn MetricsApi,
  scope: QueryScope,
  params: Params,
  forest: Forest,
  loading: LoadingCounter,
  last_page: bool,
  on_expand: OnExpand,
}

impl<'a> TreeView<'a> {
  pub fn new(api: &'a dyn MetricsApi, scope: QueryScope, params: Params) -> Self {
    Self {
      api,
      scope,
      params: params.normalized(),
      forest: Forest::default(),
      loading: LoadingCounter::default(),
      last_page: false,
      on_expand: default_loader(),
    }
  }

  pub fn forest(&self) -> &Forest {
    &self.forest
  }

  pub fn params(&self) -> &Params {
    &self.params
  }

  pub fn scope(&self) -> &QueryScope {
    &self.scope
  }

  pub fn dates(&self) -> Vec<String> {
    self.params.dates()
  }

  pub fn last_page(&self) -> bool {
    self.last_page
  }

  pub fn loading(&self) -> LoadingCounter {
    self.loading
  }

  fn dispatch(&mut self, action: Action) {
    let name = action.name();
    let forest = std::mem::take(&mut self.forest);
    self.forest = reduce(forest, action);
    tracing::debug!(action = name, revision = self.forest.revision(), roots = self.forest.len(), "dispatched");
  }

  fn tracked<T>(&mut self, f: impl FnOnce(&dyn MetricsApi) -> Result<T>) -> Result<T> {
    let api = self.api;
    self.loading.start();
    let result = f(api);
    self.loading.finish();
    result
  }

  /// Initial load: the root directory listing, or the current flat page.
  pub fn load(&mut self) -> Result<()> {
    if !self.params.directory_view {
      return self.load_flat_page();
    }

    let req = directory_request(&self.params, &self.scope, vec![ROOT_ID.to_string()]);
    let resp = self
      .tracked(|api| api.fetch_directory_metrics(&req))
      .context("FetchDirectoryMetrics for the root directory")?;

    tracing::info!(nodes = resp.nodes.len(), "loaded root directory");
    self.dispatch(Action::MergeDir {
      nodes: resp.nodes,
      parent_id: None,
      on_expand: Some(self.on_expand.clone()),
    });
    Ok(())
  }

  fn load_flat_page(&mut self) -> Result<()> {
    let offset = self.params.page.saturating_mul(self.params.page_size);
    let req = test_request(&self.params, &self.scope, offset, self.params.page_size, None);
    let resp = self
      .tracked(|api| api.fetch_test_metrics(&req))
      .with_context(|| format!("FetchTestMetrics for page {}", self.params.page))?;

    tracing::info!(page = self.params.page, tests = resp.tests.len(), last_page = resp.last_page, "loaded test page");
    self.last_page = resp.last_page;
    self.dispatch(Action::MergeTest {
      tests: resp.tests,
      parent_id: None,
      footer: None,
    });
    Ok(())
  }

  /// Expand the Path node `id`. Returns false when it was already loaded.
  pub fn expand(&mut self, id: &str) -> Result<bool> {
    let Some(node) = self.forest.find_path(id) else {
      bail!("no directory or file {id:?} in the loaded tree; expand its parent first");
    };

    let request = match node.on_expand.as_ref().and_then(|cb| cb.invoke(node)) {
      Some(r) => r,
      None => {
        tracing::debug!(id, "already loaded");
        return Ok(false);
      }
    };

    self.run_expand(request)?;
    Ok(true)
  }

  pub fn run_expand(&mut self, request: ExpandRequest) -> Result<()> {
    match request {
      ExpandRequest::Directory { parent_id } => {
        let req = directory_request(&self.params, &self.scope, vec![parent_id.clone()]);
        let resp = self
          .tracked(|api| api.fetch_directory_metrics(&req))
          .with_context(|| format!("FetchDirectoryMetrics for parents [{parent_id}]"))?;

        tracing::info!(parent_id = %parent_id, nodes = resp.nodes.len(), "expanded directory");
        self.dispatch(Action::MergeDir {
          nodes: resp.nodes,
          parent_id: Some(parent_id),
          on_expand: Some(self.on_expand.clone()),
        });
        Ok(())
      }
      ExpandRequest::Tests { file_id, pages } => self.load_file_tests(file_id, pages),
    }
  }

  fn load_file_tests(&mut self, file_id: String, pages: usize) -> Result<()> {
    let size = self.params.page_size.saturating_mul(pages);
    let req = test_request(&self.params, &self.scope, 0, size, Some(vec![file_id.clone()]));
    let resp = self
      .tracked(|api| api.fetch_test_metrics(&req))
      .with_context(|| format!("FetchTestMetrics for file {file_id}"))?;

    let footer = (!resp.last_page).then(|| LoadMore {
      file_id: file_id.clone(),
      pages_loaded: pages,
    });

    tracing::info!(file_id = %file_id, tests = resp.tests.len(), more = footer.is_some(), "expanded file");
    self.dispatch(Action::MergeTest {
      tests: resp.tests,
      parent_id: Some(file_id),
      footer,
    });
    Ok(())
  }

  /// Follow the "see more" footer under `file_id`. Returns false when the
  /// file already shows every test.
  pub fn load_more(&mut self, file_id: &str) -> Result<bool> {
    let Some(node) = self.forest.find_path(file_id) else {
      bail!("no file {file_id:?} in the loaded tree");
    };

    let Some(footer) = node.footer.clone() else {
      tracing::debug!(file_id, "no more tests to load");
      return Ok(false);
    };

    self.load_file_tests(footer.file_id, footer.pages_loaded + 1)?;
    Ok(true)
  }

  pub fn next_page(&mut self) -> Result<bool> {
    if self.params.directory_view || self.last_page {
      return Ok(false);
    }
    self.params.page += 1;
    if let Err(e) = self.load_flat_page() {
      self.params.page -= 1;
      return Err(e);
    }
    Ok(true)
  }

  pub fn prev_page(&mut self) -> Result<bool> {
    if self.params.directory_view || self.params.page == 0 {
      return Ok(false);
    }
    self.params.page -= 1;
    if let Err(e) = self.load_flat_page() {
      self.params.page += 1;
      return Err(e);
    }
    Ok(true)
  }

  /// Apply new query parameters and refresh what is on screen. On failure
  /// the previous parameters stay in effect.
  pub fn update_params(&mut self, params: Params) -> Result<()> {
    let mut params = params.normalized();
    if !params.directory_view && self.params.resets_page(&params) {
      params.page = 0;
    }
    let previous = std::mem::replace(&mut self.params, params);

    let result = if self.params.directory_view {
      self.rebuild_tree()
    } else {
      self.load_flat_page()
    };
    if result.is_err() {
      self.params = previous;
    }
    result
  }

  /// Switch the component filter: drop everything and load from the top.
  pub fn set_components(&mut self, components: Vec<String>) -> Result<()> {
    if components == self.scope.components {
      return Ok(());
    }
    self.scope.components = components;
    self.dispatch(Action::ClearDir);
    self.load()
  }

  /// Re-request the root plus every open directory and file, then replace
  /// the forest in one step.
  pub fn rebuild_tree(&mut self) -> Result<()> {
    let loaded = get_loaded_parent_ids(self.forest.roots());

    let mut parent_ids = vec![ROOT_ID.to_string()];
    parent_ids.extend(loaded.directories);
    let dir_req = directory_request(&self.params, &self.scope, parent_ids);

    let test_req = (!loaded.files.is_empty())
      .then(|| test_request(&self.params, &self.scope, 0, REBUILD_PAGE_SIZE, Some(loaded.files)));

    let mut pending = PendingRebuild::new(Some(self.on_expand.clone()));
    if test_req.is_none() {
      pending = pending.without_tests();
    }

    tracing::info!(
      parents = dir_req.parent_ids.len(),
      files = test_req.as_ref().and_then(|r| r.file_names.as_ref()).map_or(0, |f| f.len()),
      "rebuilding tree"
    );

    let api = self.api;
    let requests = 1 + usize::from(test_req.is_some());
    for _ in 0..requests {
      self.loading.start();
    }
    let (dirs, tests) = rayon::join(
      || api.fetch_directory_metrics(&dir_req),
      || test_req.as_ref().map(|req| api.fetch_test_metrics(req)),
    );
    for _ in 0..requests {
      self.loading.finish();
    }

    let dirs = dirs.with_context(|| format!("FetchDirectoryMetrics for parents {:?}", dir_req.parent_ids))?;
    let tests = tests.transpose().context("FetchTestMetrics for open files")?;

    let mut action = pending.receive_nodes(dirs.nodes);
    if let Some(tests) = tests {
      action = pending.receive_tests(tests.tests);
    }

    match action {
      Some(action) => self.dispatch(action),
      None => tracing::warn!("rebuild finished without both halves; tree left unchanged"),
    }
    Ok(())
  }
}
