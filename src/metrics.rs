// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalize sparse per-date metric lists into a date → metric → value lookup
// role: transform/metrics
// inputs: RawDateMap from the wire model
// outputs: MetricsMap (BTreeMap keyed by date, then MetricType)
// invariants:
// - every date key in the input appears in the output, and no other
// - absent values become 0.0; present values are copied unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use crate::model::{MetricType, RawDateMap};

pub type DayMetrics = BTreeMap<MetricType, f64>;
pub type MetricsMap = BTreeMap<String, DayMetrics>;

/// Build the nested metrics lookup for one node.
///
/// A date missing from the result means "no data", which callers must keep
/// distinct from a present zero.
pub fn build_metrics_map(raw: &RawDateMap) -> MetricsMap {
  raw
    .iter()
    .map(|(date, day)| {
      let inner: DayMetrics = day
        .data
        .iter()
        .map(|datum| (datum.metric_type, datum.metric_value.unwrap_or(0.0)))
        .collect();
      (date.clone(), inner)
    })
    .collect()
}

/// Value of `metric` on `date`, or None when that date has no data at all.
pub fn lookup(map: &MetricsMap, date: &str, metric: MetricType) -> Option<f64> {
  map.get(date).map(|day| day.get(&metric).copied().unwrap_or(0.0))
}
