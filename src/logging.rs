use crate::persistence::log_file;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The configured level, scoped to this crate
fn fallback_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("pantry={}", level))
}

/// RUST_LOG wins over the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(level))
}

/// Send structured logs to pantry.log in the data directory.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
pub fn init(dir: &Path, level: &str) -> Result<()> {
    let path = log_file(dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
