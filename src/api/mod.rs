// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Trait seam for the metrics backend plus backend selection (HTTP or in-memory fixture)
// role: api/seam
// inputs: Session (host + optional bearer token) or a fixture JSON file
// outputs: Box<dyn MetricsApi> used by the view orchestration
// side_effects: HTTP backend performs network calls; token discovery may spawn `luci-auth`
// invariants:
// - every transport failure surfaces as an anyhow::Error; callers never see partial responses
// - the session is passed in explicitly; no process-wide auth state
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod fixture;
pub mod http;

use anyhow::Result;

use crate::model::{
  FetchDirectoryMetricsRequest, FetchDirectoryMetricsResponse, FetchTestMetricsRequest, FetchTestMetricsResponse,
};

pub use fixture::FixtureApi;
pub use http::{HttpApi, Session};

pub trait MetricsApi: Send + Sync {
  /// Immediate children of every id in `parent_ids`, flattened into one list.
  fn fetch_directory_metrics(&self, req: &FetchDirectoryMetricsRequest) -> Result<FetchDirectoryMetricsResponse>;

  /// One page of tests, optionally restricted to `file_names`.
  fn fetch_test_metrics(&self, req: &FetchTestMetricsRequest) -> Result<FetchTestMetricsResponse>;
}

/// Discover a bearer token: env var first, then `luci-auth token` if available.
pub fn discover_token() -> Option<String> {
  if let Ok(t) = std::env::var("TEST_METRICS_TOKEN") {
    if !t.trim().is_empty() {
      return Some(t.trim().to_string());
    }
  }

  if let Ok(output) = std::process::Command::new("luci-auth").arg("token").output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

/// Pick the backend: a fixture file when given, otherwise HTTP against `host`.
pub fn build_api(host: &str, fixture: Option<&str>) -> Result<Box<dyn MetricsApi>> {
  if let Some(path) = fixture {
    tracing::debug!(path, "using fixture backend");
    return Ok(Box::new(FixtureApi::from_path(path)?));
  }

  let session = Session::new(host, discover_token());
  if session.token.is_none() {
    tracing::warn!("no token found; set TEST_METRICS_TOKEN or run: luci-auth login");
  }

  Ok(Box::new(HttpApi::new(session)))
}
