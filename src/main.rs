use anyhow::{Context, Result};
use clap::Parser;

use test_metrics_tree::cli::{normalize, Cli, OutputFormat};
use test_metrics_tree::view::TreeView;
use test_metrics_tree::{api, params, prefs, render, util};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_tracing();

  // Phase 1: preferences + normalize CLI
  let prefs_path = prefs::prefs_path();
  let mut stored = prefs_path.as_deref().map(prefs::load).unwrap_or_default();
  let remembered_size = cli.page_size;
  let remembered_components = cli.components.clone();
  let cfg = normalize(cli, &stored)?;
  tracing::debug!(config = ?cfg, "effective configuration");

  if stored.remember(remembered_size, &remembered_components) {
    if let Some(path) = &prefs_path {
      if let Err(e) = prefs::save(path, &stored) {
        tracing::warn!(error = %format!("{e:#}"), "could not save preferences");
      }
    }
  }

  // Phase 2: load the tree and replay the requested navigation
  let api = api::build_api(&cfg.host, cfg.fixture.as_deref())?;
  let mut view = TreeView::new(api.as_ref(), params::build_scope(&cfg), params::build_params(&cfg));
  view.load()?;

  for id in &cfg.expand {
    view.expand(id).with_context(|| format!("expanding {id}"))?;
  }
  for id in &cfg.more {
    view.load_more(id).with_context(|| format!("loading more tests under {id}"))?;
  }

  // Phase 3: render
  let text = match cfg.format {
    OutputFormat::Json => render::render_json(&view)?,
    OutputFormat::Tree => render::render_tree(&view),
  };
  util::write_output(&cfg.out, &text)
}
