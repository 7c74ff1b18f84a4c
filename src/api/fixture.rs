//! In-memory backend over a fixture document holding every directory node and
//! every test. Answers queries the way the real service does, so the CLI can
//! run end to end without network access.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
  DirectoryNode, FetchDirectoryMetricsRequest, FetchDirectoryMetricsResponse, FetchTestMetricsRequest,
  FetchTestMetricsResponse, TestDateMetricData,
};
use crate::tree::parent_id;

use super::MetricsApi;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureData {
  #[serde(default)]
  pub nodes: Vec<DirectoryNode>,
  #[serde(default)]
  pub tests: Vec<TestDateMetricData>,
  /// Methods that should fail, e.g. `["FetchTestMetrics"]`.
  #[serde(default)]
  pub fail: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureApi {
  data: FixtureData,
}

impl FixtureApi {
  pub fn new(data: FixtureData) -> Self {
    Self { data }
  }

  pub fn from_path(path: &str) -> Result<Self> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading fixture {}", path))?;
    let data: FixtureData = serde_json::from_str(&text).with_context(|| format!("parsing fixture {}", path))?;
    Ok(Self::new(data))
  }

  fn check(&self, method: &str) -> Result<()> {
    if self.data.fail.contains(method) {
      anyhow::bail!("{} failed: HTTP 503: fixture configured to fail", method);
    }
    Ok(())
  }
}

fn matches_filter(test: &TestDateMetricData, filter: &str) -> bool {
  filter.is_empty() || test.test_name.to_lowercase().contains(&filter.to_lowercase())
}

impl MetricsApi for FixtureApi {
  fn fetch_directory_metrics(&self, req: &FetchDirectoryMetricsRequest) -> Result<FetchDirectoryMetricsResponse> {
    self.check("FetchDirectoryMetrics")?;

    let mut nodes = Vec::new();
    for parent in &req.parent_ids {
      nodes.extend(
        self
          .data
          .nodes
          .iter()
          .filter(|n| n.id != *parent && parent_id(&n.id) == *parent)
          .cloned(),
      );
    }

    Ok(FetchDirectoryMetricsResponse { nodes })
  }

  fn fetch_test_metrics(&self, req: &FetchTestMetricsRequest) -> Result<FetchTestMetricsResponse> {
    self.check("FetchTestMetrics")?;

    let matching: Vec<&TestDateMetricData> = self
      .data
      .tests
      .iter()
      .filter(|t| match &req.file_names {
        Some(files) => files.contains(&t.file_name),
        None => true,
      })
      .filter(|t| matches_filter(t, &req.filter))
      .collect();

    let end = req.page_offset.saturating_add(req.page_size).min(matching.len());
    let tests: Vec<TestDateMetricData> = matching
      .iter()
      .skip(req.page_offset)
      .take(req.page_size)
      .map(|t| (*t).clone())
      .collect();

    Ok(FetchTestMetricsResponse {
      tests,
      last_page: end >= matching.len(),
    })
  }
}
