// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Remember the last chosen page size and component filter between runs
// role: persistence/preferences
// inputs: TEST_METRICS_PREFS, XDG_CONFIG_HOME, HOME; values given on the command line
// outputs: Prefs loaded from / written to prefs.json
// side_effects: Reads and writes one JSON file; creates its parent directory
// invariants:
// - a missing or unreadable file behaves like an empty one
// - values given explicitly on the command line win and are remembered
// errors: load never fails; save surfaces IO errors with the file path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub page_size: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub components: Option<Vec<String>>,
}

impl Prefs {
  pub fn page_size_or(&self, cli: Option<usize>) -> usize {
    cli.or(self.page_size).unwrap_or(DEFAULT_PAGE_SIZE)
  }

  pub fn components_or(&self, cli: &[String]) -> Vec<String> {
    if !cli.is_empty() {
      return cli.to_vec();
    }
    self.components.clone().unwrap_or_default()
  }

  /// Record explicit command-line choices. Returns true when anything changed.
  pub fn remember(&mut self, page_size: Option<usize>, components: &[String]) -> bool {
    let mut changed = false;

    if let Some(size) = page_size {
      if self.page_size != Some(size) {
        self.page_size = Some(size);
        changed = true;
      }
    }

    if !components.is_empty() && self.components.as_deref() != Some(components) {
      self.components = Some(components.to_vec());
      changed = true;
    }

    changed
  }
}

/// Location of prefs.json, or None when no config directory can be derived.
pub fn prefs_path() -> Option<PathBuf> {
  if let Ok(p) = std::env::var("TEST_METRICS_PREFS") {
    if !p.trim().is_empty() {
      return Some(PathBuf::from(p));
    }
  }

  let base = std::env::var("XDG_CONFIG_HOME")
    .ok()
    .filter(|s| !s.is_empty())
    .map(PathBuf::from)
    .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))?;

  Some(base.join("test-metrics-tree").join("prefs.json"))
}

pub fn load(path: &Path) -> Prefs {
  let text = match std::fs::read_to_string(path) {
    Ok(t) => t,
    Err(_) => return Prefs::default(),
  };

  match serde_json::from_str(&text) {
    Ok(p) => p,
    Err(e) => {
      tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
      Prefs::default()
    }
  }
}

pub fn save(path: &Path, prefs: &Prefs) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, serde_json::to_vec_pretty(prefs)?).with_context(|| format!("writing {}", path.display()))?;
  Ok(())
}
