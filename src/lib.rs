//! Lazily loaded directory/test metrics tree.
//!
//! `tree` holds the pure forest model and reducer; `view` drives it against a
//! `MetricsApi` backend. The binary in `main.rs` is a thin CLI over both.

pub mod api;
pub mod cli;
pub mod metrics;
pub mod model;
pub mod params;
pub mod prefs;
pub mod render;
pub mod tree;
pub mod util;
pub mod view;
pub mod window;
