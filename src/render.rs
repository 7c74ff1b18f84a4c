//! Output renderers: a JSON document for machines and an indented tree for people.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::metrics::lookup;
use crate::model::MetricType;
use crate::params::Params;
use crate::tree::{LoadMore, Node};
use crate::view::TreeView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
  pub dates: Vec<String>,
  pub params: &'a Params,
  pub components: &'a [String],
  pub metrics: &'a [MetricType],
  pub revision: u64,
  pub last_page: bool,
  pub forest: &'a [Node],
}

impl<'a> Report<'a> {
  pub fn from_view(view: &'a TreeView<'_>) -> Self {
    Self {
      dates: view.dates(),
      params: view.params(),
      components: &view.scope().components,
      metrics: &view.scope().metrics,
      revision: view.forest().revision(),
      last_page: view.last_page(),
      forest: view.forest().roots(),
    }
  }
}

pub fn render_json(view: &TreeView<'_>) -> Result<String> {
  let mut text = serde_json::to_string_pretty(&Report::from_view(view))?;
  text.push('\n');
  Ok(text)
}

/// One line per node: indent, marker, name, (subname), metrics on the sort date.
///
/// Markers: `+` not yet loaded, `-` children shown, blank for leaves.
pub fn render_tree(view: &TreeView<'_>) -> String {
  let dates = view.dates();
  let sort_date = view.params().sort_spec(&dates).sort_date;
  let metrics = &view.scope().metrics;

  let mut out = String::new();
  let _ = writeln!(out, "# dates: {}", dates.join(" "));
  let _ = writeln!(
    out,
    "# sort: {} {} on {}",
    view.params().sort.label(),
    if view.params().ascending { "asc" } else { "desc" },
    sort_date
  );

  let tree = TreeText {
    sort_date: &sort_date,
    metrics,
  };
  for node in view.forest().roots() {
    tree.node(&mut out, node, 0);
  }

  if !view.params().directory_view {
    let _ = writeln!(
      out,
      "# page {}{}",
      view.params().page,
      if view.last_page() { " (last)" } else { "" }
    );
  }

  out
}

struct TreeText<'a> {
  sort_date: &'a str,
  metrics: &'a [MetricType],
}

impl TreeText<'_> {
  fn node(&self, out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{}{} {}", indent, marker(node), node.name());
    if let Some(sub) = node.subname() {
      let _ = write!(out, " ({})", sub);
    }
    for metric in self.metrics {
      let value = lookup(node.metrics(), self.sort_date, *metric);
      let _ = write!(out, "  {}={}", metric.label(), format_value(value));
    }
    out.push('\n');

    for child in node.rows() {
      self.node(out, child, depth + 1);
    }

    if let Node::Path(path) = node {
      if let Some(footer) = &path.footer {
        self.footer(out, footer, depth + 1);
      }
    }
  }

  fn footer(&self, out: &mut String, footer: &LoadMore, depth: usize) {
    let _ = writeln!(
      out,
      "{}  ... more tests ({} page(s) loaded; --more {})",
      "  ".repeat(depth),
      footer.pages_loaded,
      footer.file_id
    );
  }
}

fn marker(node: &Node) -> char {
  match node {
    Node::Path(p) if !p.loaded => '+',
    Node::Path(_) => '-',
    Node::Test(t) if t.is_expandable => '-',
    _ => ' ',
  }
}

fn format_value(value: Option<f64>) -> String {
  match value {
    None => "-".to_string(),
    Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
    Some(v) => format!("{:.2}", v),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeSet;

  use crate::api::fixture::{FixtureApi, FixtureData};
  use crate::model::{DailyMetrics, DirectoryNode, DirectoryNodeType, MetricDatum, RawDateMap, TestDateMetricData};
  use crate::params::tests::params;
  use crate::params::QueryScope;

  fn metrics(runs: f64, avg: Option<f64>) -> RawDateMap {
    let mut raw = RawDateMap::new();
    raw.insert(
      "2023-07-11".into(),
      DailyMetrics {
        data: vec![
          MetricDatum {
            metric_type: MetricType::NumRuns,
            metric_value: Some(runs),
          },
          MetricDatum {
            metric_type: MetricType::AvgRuntime,
            metric_value: avg,
          },
        ],
      },
    );
    raw
  }

  fn api() -> FixtureApi {
    FixtureApi::new(FixtureData {
      nodes: vec![
        DirectoryNode {
          id: "//chrome".into(),
          node_type: DirectoryNodeType::Directory,
          name: "chrome".into(),
          metrics: metrics(12.0, Some(1.5)),
        },
        DirectoryNode {
          id: "//chrome/a_test.cc".into(),
          node_type: DirectoryNodeType::Filename,
          name: "a_test.cc".into(),
          metrics: metrics(3.0, None),
        },
      ],
      tests: vec![TestDateMetricData {
        test_id: "A.One".into(),
        test_name: "A.One".into(),
        file_name: "//chrome/a_test.cc".into(),
        metrics: RawDateMap::new(),
        variants: Vec::new(),
      }],
      fail: BTreeSet::new(),
    })
  }

  fn scope() -> QueryScope {
    QueryScope {
      components: Vec::new(),
      metrics: vec![MetricType::NumRuns, MetricType::AvgRuntime],
    }
  }

  #[test]
  fn tree_text_marks_loaded_and_unloaded_nodes() {
    let api = api();
    let mut view = TreeView::new(&api, scope(), params());
    view.load().unwrap();
    view.expand("//chrome").unwrap();

    let text = render_tree(&view);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# dates: 2023-07-11");
    assert_eq!(lines[2], "- chrome/  runs=12  avg_runtime=1.50");
    assert_eq!(lines[3], "  + a_test.cc  runs=3  avg_runtime=0");
    assert_eq!(lines.len(), 4);

    view.expand("//chrome/a_test.cc").unwrap();
    let text = render_tree(&view);
    assert!(text.contains("\n  - a_test.cc  runs=3"));
    assert!(text.contains("\n      A.One (//chrome/a_test.cc)  runs=-  avg_runtime=-\n"));
  }

  #[test]
  fn json_report_has_forest_array_and_dates() {
    let api = api();
    let mut view = TreeView::new(&api, scope(), params());
    view.load().unwrap();

    let v: serde_json::Value = serde_json::from_str(&render_json(&view).unwrap()).unwrap();
    assert_eq!(v["dates"], serde_json::json!(["2023-07-11"]));
    assert_eq!(v["revision"], 1);
    assert_eq!(v["forest"][0]["kind"], "path");
    assert_eq!(v["forest"][0]["type"], "DIRECTORY");
    assert_eq!(v["forest"][0]["loaded"], false);
    assert_eq!(v["forest"][0]["metrics"]["2023-07-11"]["NUM_RUNS"], 12.0);
    assert_eq!(v["params"]["directoryView"], true);
  }

  #[test]
  fn value_formatting() {
    assert_eq!(format_value(None), "-");
    assert_eq!(format_value(Some(4.0)), "4");
    assert_eq!(format_value(Some(0.126)), "0.13");
  }
}
