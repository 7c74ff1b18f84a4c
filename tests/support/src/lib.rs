//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support", features = ["serde"] }
//! ```
//!
//! Then in tests:
//! ```rust,ignore
//! use test_support::{init_tracing, fixture_path};
//!
//! #[test]
//! fn example() {
//!     init_tracing();
//!     let _doc = fixture_path("tree.json");
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::{
  env,
  path::{Path, PathBuf},
};

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
  static INIT: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,test_metrics_tree=info"));
    // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
  });
  Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// This crate lives in `tests/support`, so the fixtures sit one level up.
/// Stable regardless of the runner's working directory (cargo vs nextest).
pub fn fixtures_dir() -> PathBuf {
  let here = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  here.parent().map(Path::to_path_buf).unwrap_or(here).join("fixtures")
}

/// Absolute path of a fixture, as a string ready to pass on a command line.
pub fn fixture_path<P: AsRef<Path>>(rel_path: P) -> String {
  fixtures_dir().join(rel_path).to_string_lossy().to_string()
}

/// Deserialize a JSON fixture into `T` (enable `serde` feature).
#[cfg(feature = "serde")]
pub fn read_fixture_json<T, P>(rel_path: P) -> T
where
  T: serde::de::DeserializeOwned,
  P: AsRef<Path>,
{
  let path = fixtures_dir().join(rel_path);
  let file =
    std::fs::File::open(&path).unwrap_or_else(|e| panic!("failed to open fixture {}: {e}", path.display()));
  serde_json::from_reader::<_, T>(file)
    .unwrap_or_else(|e| panic!("failed to parse JSON fixture {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
  tempfile::tempdir().expect("create tempdir")
}

/// Set multiple environment variables for the duration of the returned guard.
pub fn with_env(vars: &[(&str, &str)]) -> EnvGuard {
  EnvGuard::set_many(vars)
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
///
/// The command starts with a scrubbed auth/prefs environment so runs never
/// read the developer's token or remembered preferences.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
  init_tracing();
  let mut cmd = assert_cmd::Command::cargo_bin(bin).expect("binary target not found");
  cmd.env_remove("TEST_METRICS_TOKEN").env_remove("RUST_LOG");
  cmd
}

/// Guard for temporarily setting environment variables.
pub struct EnvGuard {
  prev: Vec<(String, Option<String>)>,
}

impl EnvGuard {
  pub fn set_many(kv: &[(&str, &str)]) -> Self {
    let mut prev = Vec::with_capacity(kv.len());
    for (k, v) in kv {
      let k_owned = k.to_string();
      prev.push((k_owned.clone(), env::var(k).ok()));
      env::set_var(k, v);
    }
    Self { prev }
  }
}

impl Drop for EnvGuard {
  fn drop(&mut self) {
    for (k, old) in self.prev.drain(..) {
      match old {
        Some(v) => env::set_var(&k, v),
        None => env::remove_var(&k),
      }
    }
  }
}
