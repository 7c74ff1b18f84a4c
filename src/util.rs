// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small helpers shared by main: logging setup, output writing, and man page rendering
// role: utilities/helpers
// inputs: RUST_LOG; output target ("-" or a path); clap CommandFactory
// outputs: Configured tracing subscriber, written output, man page text
// side_effects: Installs the global subscriber; write_output creates parent directories and writes a file
// invariants:
// - logs go to stderr so stdout carries only the rendered report
// - write_output("-") writes to stdout and never touches the filesystem
// errors: IO errors bubble with the target path attached
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` overrides the default `warn` filter.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Write `text` to stdout when `out` is "-", otherwise to the file at `out`.
pub fn write_output(out: &str, text: &str) -> Result<()> {
  if out == "-" {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(text.as_bytes()).context("writing to stdout")?;
    lock.flush().context("flushing stdout")?;
    return Ok(());
  }

  let path = Path::new(out);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
  tracing::info!(path = %path.display(), bytes = text.len(), "wrote report");

  Ok(())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
