use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use crate::error::{ProcessingError, Result};

/// Install the global `tracing` subscriber.
///
/// Warnings and errors only by default; `verbose` enables debug output.
/// Diagnostics go to stderr, or to `log_file` when one is given, so they
/// never interleave with a report written to stdout.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| ProcessingError::OutputUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("Failed to initialize logging: {e}")))
}
