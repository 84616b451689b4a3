//! Logging setup for the CLI.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use surveyor::util::fs::ensure_dir;

fn stderr_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("surveyor=debug")
    } else {
        EnvFilter::new("surveyor=info")
    }
}

/// Install the process-wide subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(stderr_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Additionally log everything to `<log_dir>/<timestamp>.<edr>.log` for the
/// lifetime of the returned guard.
pub fn log_to_file(verbose: bool, log_dir: &Path, edr: &str) -> Result<(PathBuf, DefaultGuard)> {
    ensure_dir(log_dir)?;

    let file_name = format!("{}.{}.log", Utc::now().format("%Y%m%d%H%M%S"), edr);
    let path = log_dir.join(file_name);
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
                .with_filter(stderr_filter(verbose)),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new("surveyor=debug")),
        );

    Ok((path, tracing::subscriber::set_default(subscriber)))
}
