//! Floatbar - floating search bar demo.
//!
//! This binary opens the overlay window:
//! - Intro overlay, dismissed by any key
//! - Shift+Space to show/hide the search bar
//! - Enter submits, Up/Down move through results, Esc hides
//! - Toast notifications for submissions
//!
//! Logs are written to `<data dir>/logs/floatbar.log`.

use anyhow::Context;
use eframe::egui;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use floatbar::config::FloatbarConfig;
use floatbar::ui::results::load_results;
use floatbar::ui::{FloatbarApp, Overlay};

/// Initialize tracing with a daily rolling file, falling back to stderr.
fn init_logging() -> Option<WorkerGuard> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "floatbar=info".to_string());
    let log_dir = FloatbarConfig::data_dir().join("logs");

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "floatbar.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_ansi(false)
        .init();

    info!("Logging initialized to {:?}", log_dir);
    Some(guard)
}

fn main() -> anyhow::Result<()> {
    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging();
    info!("Floatbar v{} starting", env!("CARGO_PKG_VERSION"));

    let config = FloatbarConfig::load();

    let results = match &config.results_file {
        Some(path) => match load_results(path) {
            Ok(results) => results,
            Err(e) => {
                warn!("Failed to load results from {:?}: {}", path, e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("Floatbar"),
        ..Default::default()
    };

    eframe::run_native(
        "Floatbar",
        options,
        Box::new(move |cc| {
            let overlay = Overlay::new(&config).with_results(results);
            Ok(Box::new(FloatbarApp::new(cc, overlay)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
    .context("Failed to run the overlay window")
}
