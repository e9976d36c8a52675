//! strokeplot viewer.
//!
//! Runs the charts against the built-in synthetic rower.
//!
//! ```bash
//! cargo run -- [--config rower.yaml] [--rate 24]
//! ```
//! Press `N` in the window to start a new session.

use std::path::PathBuf;

use strokeplot::demo::{spawn_demo, SyntheticRower};
use strokeplot::{channel_samples, run_strokeplot, StrokeplotConfig};
use tracing::{error, info};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config_path: Option<PathBuf> = None;
    let mut rate_spm = 24.0;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next().map(PathBuf::from),
            "--rate" => {
                if let Some(r) = args.next().and_then(|v| v.parse::<f64>().ok()) {
                    rate_spm = r;
                }
            }
            other => error!(arg = other, "ignoring unknown argument"),
        }
    }

    let config = match config_path {
        Some(path) => match StrokeplotConfig::load(&path) {
            Ok(cfg) => {
                info!(path = %path.display(), "loaded configuration");
                cfg
            }
            Err(e) => {
                error!("{e}; falling back to defaults");
                StrokeplotConfig::default()
            }
        },
        None => StrokeplotConfig::default(),
    };

    let (sink, rx) = channel_samples();
    spawn_demo(sink, SyntheticRower::new(10_000, rate_spm));
    info!(rate_spm, "synthetic rower started");

    run_strokeplot(rx, config)
}
