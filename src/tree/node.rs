//! Node factory: backend records → tree nodes.
//!
//! Pure conversions. Malformed records (missing names, empty ids) pass their
//! empty fields through rather than failing.

use crate::metrics::build_metrics_map;
use crate::model::{DirectoryNode, DirectoryNodeType, TestDateMetricData, TestVariantData};

use super::{Node, OnExpand, PathKind, PathNode, TestNode, TestVariantNode};

/// Build an unloaded Path node from a directory listing record.
pub fn build_path_node(record: &DirectoryNode, on_expand: Option<OnExpand>) -> PathNode {
  let kind = match record.node_type {
    DirectoryNodeType::Directory => PathKind::Directory,
    DirectoryNodeType::Filename => PathKind::Filename,
  };
  let name = match kind {
    PathKind::Directory => format!("{}/", record.name),
    PathKind::Filename => record.name.clone(),
  };

  PathNode {
    id: record.id.clone(),
    name,
    subname: None,
    path: record.id.clone(),
    kind,
    loaded: false,
    is_expandable: true,
    metrics: build_metrics_map(&record.metrics),
    rows: Vec::new(),
    footer: None,
    on_expand,
  }
}

pub fn build_variant_node(test_id: &str, variant: &TestVariantData) -> TestVariantNode {
  TestVariantNode {
    id: format!("{}:{}:{}:{}", test_id, variant.bucket, variant.builder, variant.suite),
    name: variant.suite.clone(),
    subname: Some(format!("{}/{}", variant.bucket, variant.builder)),
    suite: variant.suite.clone(),
    builder: variant.builder.clone(),
    bucket: variant.bucket.clone(),
    metrics: build_metrics_map(&variant.metrics),
  }
}

/// Build a Test node with one variant row per reported configuration.
pub fn build_test_node(record: &TestDateMetricData) -> TestNode {
  let rows: Vec<Node> = record
    .variants
    .iter()
    .map(|v| Node::Variant(build_variant_node(&record.test_id, v)))
    .collect();

  TestNode {
    id: record.test_id.clone(),
    name: record.test_name.clone(),
    subname: (!record.file_name.is_empty()).then(|| record.file_name.clone()),
    file_name: record.file_name.clone(),
    is_expandable: !rows.is_empty(),
    metrics: build_metrics_map(&record.metrics),
    rows,
  }
}

pub fn path_nodes(records: &[DirectoryNode], on_expand: Option<&OnExpand>) -> Vec<Node> {
  records
    .iter()
    .map(|r| Node::Path(build_path_node(r, on_expand.cloned())))
    .collect()
}

pub fn test_nodes(records: &[TestDateMetricData]) -> Vec<Node> {
  records.iter().map(|r| Node::Test(build_test_node(r))).collect()
}
