// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compute the ordered list of date keys a metrics query asks the backend for
// role: time/windowing
// inputs: Reference date (local calendar day), Period, timeline flag
// outputs: Vec<String> of YYYY-MM-DD keys, earliest first
// invariants:
// - snapshot view ⇒ exactly one key (the reference date)
// - timeline view ⇒ exactly TIMELINE_COLUMNS keys, strictly increasing by the period step, last == reference date
// errors: None; every NaiveDate in chrono's range yields a list
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of date columns shown in timeline view.
pub const TIMELINE_COLUMNS: usize = 5;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "lowercase")]
pub enum Period {
  Day,
  Week,
}

impl Period {
  pub fn step_days(self) -> i64 {
    match self {
      Period::Day => 1,
      Period::Week => 7,
    }
  }
}

pub fn format_date(d: NaiveDate) -> String {
  d.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).with_context(|| format!("parsing date {s:?}, expected YYYY-MM-DD"))
}

/// Today's calendar day in the viewer's local timezone.
pub fn today_local() -> NaiveDate {
  Local::now().date_naive()
}

/// Date keys to query, earliest first.
///
/// Snapshot view asks for the reference date only. Timeline view walks back
/// `TIMELINE_COLUMNS - 1` period steps from the reference date.
pub fn compute_dates(date: NaiveDate, period: Period, timeline_view: bool) -> Vec<String> {
  if !timeline_view {
    return vec![format_date(date)];
  }

  let step = period.step_days();
  let mut out: Vec<String> = Vec::with_capacity(TIMELINE_COLUMNS);

  for back in (0..TIMELINE_COLUMNS as i64).rev() {
    // Saturate at chrono's minimum instead of panicking on absurd inputs.
    let d = date.checked_sub_signed(Duration::days(back * step)).unwrap_or(NaiveDate::MIN);
    out.push(format_date(d));
  }

  out
}
