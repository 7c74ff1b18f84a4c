// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON wire model of the metrics backend (directory and test queries)
// role: model/types
// outputs: Serializable request/response structs with lowerCamelCase field names
// invariants: Absent collections deserialize as empty; absent metric values stay None until the metric map builder runs
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::window::Period;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "kebab-case")]
pub enum MetricType {
  NumRuns,
  NumFailures,
  NumFlake,
  AvgRuntime,
  TotalRuntime,
  AvgCores,
  P50Runtime,
  P90Runtime,
  #[serde(other)]
  #[value(skip)]
  MetricTypeUnspecified,
}

impl MetricType {
  pub fn defaults() -> Vec<MetricType> {
    vec![
      MetricType::NumRuns,
      MetricType::NumFailures,
      MetricType::AvgRuntime,
      MetricType::TotalRuntime,
      MetricType::AvgCores,
    ]
  }

  /// Short column label used by the text renderer.
  pub fn label(self) -> &'static str {
    match self {
      MetricType::NumRuns => "runs",
      MetricType::NumFailures => "failures",
      MetricType::NumFlake => "flakes",
      MetricType::AvgRuntime => "avg_runtime",
      MetricType::TotalRuntime => "total_runtime",
      MetricType::AvgCores => "avg_cores",
      MetricType::P50Runtime => "p50_runtime",
      MetricType::P90Runtime => "p90_runtime",
      MetricType::MetricTypeUnspecified => "unspecified",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDatum {
  pub metric_type: MetricType,
  // The backend omits zero values entirely.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metric_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
  #[serde(default)]
  pub data: Vec<MetricDatum>,
}

/// Date key (`YYYY-MM-DD`) → metrics reported for that day.
pub type RawDateMap = BTreeMap<String, DailyMetrics>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectoryNodeType {
  Directory,
  Filename,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryNode {
  #[serde(default)]
  pub id: String,
  #[serde(rename = "type")]
  pub node_type: DirectoryNodeType,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub metrics: RawDateMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVariantData {
  #[serde(default)]
  pub suite: String,
  #[serde(default)]
  pub builder: String,
  #[serde(default)]
  pub bucket: String,
  #[serde(default)]
  pub metrics: RawDateMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDateMetricData {
  #[serde(default)]
  pub test_id: String,
  #[serde(default)]
  pub test_name: String,
  #[serde(default)]
  pub file_name: String,
  #[serde(default)]
  pub metrics: RawDateMap,
  #[serde(default)]
  pub variants: Vec<TestVariantData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
  pub metric: MetricType,
  pub ascending: bool,
  pub sort_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDirectoryMetricsRequest {
  pub components: Vec<String>,
  pub period: Period,
  pub dates: Vec<String>,
  pub parent_ids: Vec<String>,
  pub metrics: Vec<MetricType>,
  #[serde(skip_serializing_if = "String::is_empty", default)]
  pub filter: String,
  pub sort: SortSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDirectoryMetricsResponse {
  #[serde(default)]
  pub nodes: Vec<DirectoryNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTestMetricsRequest {
  pub components: Vec<String>,
  pub period: Period,
  pub dates: Vec<String>,
  pub metrics: Vec<MetricType>,
  #[serde(skip_serializing_if = "String::is_empty", default)]
  pub filter: String,
  pub page_offset: usize,
  pub page_size: usize,
  pub sort: SortSpec,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub file_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTestMetricsResponse {
  #[serde(default)]
  pub tests: Vec<TestDateMetricData>,
  #[serde(default)]
  pub last_page: bool,
}
