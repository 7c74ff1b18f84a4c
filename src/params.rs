use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cli::EffectiveConfig;
use crate::model::{FetchDirectoryMetricsRequest, FetchTestMetricsRequest, MetricType, SortSpec};
use crate::window::{compute_dates, Period};

/// Query configuration shared by every fetch a view issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
  pub page: usize,
  pub page_size: usize,
  pub filter: String,
  pub date: NaiveDate,
  pub period: Period,
  pub sort: MetricType,
  pub ascending: bool,
  /// Which date column drives the sort in timeline view.
  pub sort_index: usize,
  pub timeline_view: bool,
  pub directory_view: bool,
}

impl Params {
  /// Directory view never pages; the sort column always names an existing date.
  pub fn normalized(mut self) -> Self {
    if self.directory_view {
      self.page = 0;
    }
    let last = self.dates().len().saturating_sub(1);
    self.sort_index = self.sort_index.min(last);
    self
  }

  pub fn dates(&self) -> Vec<String> {
    compute_dates(self.date, self.period, self.timeline_view)
  }

  pub fn sort_spec(&self, dates: &[String]) -> SortSpec {
    let idx = self.sort_index.min(dates.len().saturating_sub(1));
    SortSpec {
      metric: self.sort,
      ascending: self.ascending,
      sort_date: dates.get(idx).cloned().unwrap_or_default(),
    }
  }

  /// True when a change to `other` invalidates the current flat-view page.
  pub fn resets_page(&self, other: &Params) -> bool {
    self.filter != other.filter
      || self.date != other.date
      || self.period != other.period
      || self.timeline_view != other.timeline_view
      || self.page_size != other.page_size
  }
}

/// What a view is scoped to, independent of paging/sort parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryScope {
  pub components: Vec<String>,
  pub metrics: Vec<MetricType>,
}

pub fn directory_request(params: &Params, scope: &QueryScope, parent_ids: Vec<String>) -> FetchDirectoryMetricsRequest {
  let dates = params.dates();
  FetchDirectoryMetricsRequest {
    components: scope.components.clone(),
    period: params.period,
    sort: params.sort_spec(&dates),
    dates,
    parent_ids,
    metrics: scope.metrics.clone(),
    filter: params.filter.clone(),
  }
}

pub fn test_request(
  params: &Params,
  scope: &QueryScope,
  page_offset: usize,
  page_size: usize,
  file_names: Option<Vec<String>>,
) -> FetchTestMetricsRequest {
  let dates = params.dates();
  FetchTestMetricsRequest {
    components: scope.components.clone(),
    period: params.period,
    sort: params.sort_spec(&dates),
    dates,
    metrics: scope.metrics.clone(),
    filter: params.filter.clone(),
    page_offset,
    page_size,
    file_names,
  }
}

pub fn build_params(cfg: &EffectiveConfig) -> Params {
  let sort_index = cfg.sort_index.unwrap_or(usize::MAX);
  Params {
    page: cfg.page,
    page_size: cfg.page_size,
    filter: cfg.filter.clone(),
    date: cfg.date,
    period: cfg.period,
    sort: cfg.sort_metric,
    ascending: cfg.ascending,
    sort_index,
    timeline_view: cfg.timeline,
    directory_view: cfg.directory_view,
  }
  .normalized()
}

pub fn build_scope(cfg: &EffectiveConfig) -> QueryScope {
  QueryScope {
    components: cfg.components.clone(),
    metrics: cfg.metrics.clone(),
  }
}
