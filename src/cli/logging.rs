//! Logging initialization

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialize logging
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--debug`.
/// With `to_file` the output goes to a temporary file whose path is returned.
pub fn init_logging(debug: bool, to_file: bool) -> Result<Option<PathBuf>> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if !to_file {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(true)
            .init();
        return Ok(None);
    }

    // Keep the file after the handle is dropped so it can be inspected later
    let (file, path) = tempfile::Builder::new()
        .prefix("lightspeed-")
        .suffix(".log")
        .tempfile()
        .context("Failed to create log file")?
        .keep()
        .context("Failed to persist log file")?;

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(path))
}
