//! Log backend. The terminal is owned by the UI, so records go to a file.
//!
//! Code logs through the `log` macros; the tracing-subscriber `fmt` layer
//! picks them up via its log bridge.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::settings::Settings;

/// Installs the global logger. `RUST_LOG` wins over `log_level`.
pub fn init(settings: &Settings) -> Result<PathBuf, AppError> {
    let path = settings.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(AppError::Logger)?;

    Ok(path)
}
