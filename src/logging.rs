use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::{TVConfig, TVError};

pub const LOG_ENV_VAR: &str = "TABVIEW_LOG";

/// Sends tracing output to the configured log file.
///
/// The terminal is owned by the UI, so without a log file nothing is installed.
pub fn init_tracing(cfg: &TVConfig) -> Result<bool, TVError> {
    let Some(path) = cfg.log_file.as_ref() else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .map_err(|e| TVError::LoggingFailed(format!("invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| TVError::LoggingFailed(e.to_string()))?;
    Ok(true)
}
