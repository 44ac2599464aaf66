//! `tracing` subscriber installation.

use crate::config::TaskdeskSettings;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter `{directive}`: {source}")]
    InvalidFilter {
        /// Rejected directive.
        directive: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("tracing init failed: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Parses a filter directive, letting `RUST_LOG` take precedence.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when neither `RUST_LOG` nor
/// `directive` is a valid filter.
pub fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
            directive: directive.to_owned(),
            source,
        })
    })
}

/// Installs the global fmt subscriber described by `settings`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(settings: &TaskdeskSettings) -> Result<(), TelemetryError> {
    let filter = build_filter(settings.log_filter())?;
    let builder = fmt().with_env_filter(filter);
    let installed = if settings.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(TelemetryError::Install)
}
