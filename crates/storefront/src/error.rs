//! Top-level error type for the storefront binary.
//!
//! Network failures never reach this type: the [`Storefront`](crate::Storefront)
//! logs them and keeps its last known state. Only startup and console
//! failures end the program.

use thiserror::Error;

use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terminal input or output failed.
    #[error("Console error: {0}")]
    Console(#[from] std::io::Error),
}

impl AppError {
    /// Report the error to Sentry (no-op without an initialized client) and
    /// the log.
    pub fn report(&self) {
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront stopped"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
