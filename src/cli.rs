use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::model::MetricType;
use crate::prefs::Prefs;
use crate::window::{parse_date, today_local, Period};

pub const DEFAULT_HOST: &str = "chrome-test-metrics.appspot.com";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  Json,
  Tree,
}

#[derive(Parser, Debug)]
#[command(
    name = "test-metrics-tree",
    version,
    about = "Browse per-directory and per-test run metrics as a lazily loaded tree",
    long_about = None
)]
pub struct Cli {
  /// Metrics service host (scheme optional; https is assumed)
  #[arg(long, default_value = DEFAULT_HOST)]
  pub host: String,

  /// Restrict to a component, e.g. "Blink>Layout" (repeatable; remembered between runs)
  #[arg(long = "component")]
  pub components: Vec<String>,

  /// Reference date YYYY-MM-DD (default: today, local time)
  #[arg(long)]
  pub date: Option<String>,

  /// Aggregation period of one date column
  #[arg(long, value_enum, default_value_t = Period::Day)]
  pub period: Period,

  /// Show several date columns ending at --date instead of a single snapshot
  #[arg(long)]
  pub timeline: bool,

  /// List tests flat (paged) instead of by directory
  #[arg(long)]
  pub flat: bool,

  /// Only tests whose name contains this text
  #[arg(long, default_value = "")]
  pub filter: String,

  /// Page number for the flat view (0-based; ignored in directory view)
  #[arg(long, default_value_t = 0)]
  pub page: usize,

  /// Tests per page (remembered between runs; default 25)
  #[arg(long)]
  pub page_size: Option<usize>,

  /// Metric to sort by
  #[arg(long, value_enum, default_value_t = MetricType::NumRuns)]
  pub sort_metric: MetricType,

  /// Sort ascending instead of descending
  #[arg(long)]
  pub ascending: bool,

  /// Date column that drives the sort in timeline view (default: the last one)
  #[arg(long)]
  pub sort_index: Option<usize>,

  /// Metric to request (repeatable; default: runs, failures, avg/total runtime, avg cores)
  #[arg(long = "metric", value_enum)]
  pub metrics: Vec<MetricType>,

  /// Expand a directory or file by id, e.g. "//chrome/browser" (repeatable; applied in order)
  #[arg(long = "expand")]
  pub expand: Vec<String>,

  /// Load one more page of tests under an expanded file (repeatable)
  #[arg(long = "more")]
  pub more: Vec<String>,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  pub format: OutputFormat,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Serve queries from a fixture document instead of the network (hidden; tests only)
  #[arg(long, hide = true)]
  pub fixture: Option<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub host: String,
  pub components: Vec<String>,
  pub date: NaiveDate,
  pub period: Period,
  pub timeline: bool,
  pub directory_view: bool,
  pub filter: String,
  pub page: usize,
  pub page_size: usize,
  pub sort_metric: MetricType,
  pub ascending: bool,
  pub sort_index: Option<usize>,
  pub metrics: Vec<MetricType>,
  pub expand: Vec<String>,
  pub more: Vec<String>,
  pub format: OutputFormat,
  pub out: String,
  pub fixture: Option<String>,
}

pub fn normalize(cli: Cli, prefs: &Prefs) -> Result<EffectiveConfig> {
  if cli.page_size == Some(0) {
    bail!("--page-size must be greater than 0");
  }

  let date = match cli.date.as_deref() {
    Some(s) => parse_date(s)?,
    None => today_local(),
  };

  let directory_view = !cli.flat;

  if !directory_view && !cli.expand.is_empty() {
    bail!("--expand only applies to the directory view; drop --flat");
  }
  if !directory_view && !cli.more.is_empty() {
    bail!("--more only applies to the directory view; use --page with --flat");
  }

  let page = if directory_view && cli.page > 0 {
    tracing::warn!(page = cli.page, "--page is ignored in the directory view");
    0
  } else {
    cli.page
  };

  let metrics = if cli.metrics.is_empty() {
    MetricType::defaults()
  } else {
    cli.metrics
  };

  Ok(EffectiveConfig {
    host: cli.host,
    components: prefs.components_or(&cli.components),
    date,
    period: cli.period,
    timeline: cli.timeline,
    directory_view,
    filter: cli.filter,
    page,
    page_size: prefs.page_size_or(cli.page_size),
    sort_metric: cli.sort_metric,
    ascending: cli.ascending,
    sort_index: cli.sort_index,
    metrics,
    expand: cli.expand,
    more: cli.more,
    format: cli.format,
    out: cli.out,
    fixture: cli.fixture,
  })
}
