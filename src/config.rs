//! Runtime settings loaded via `OrthoConfig`.
//!
//! Values come from `TASKDESK_*` environment variables or a configuration
//! file. Everything except the database URL has a default.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_FILTER: &str = "info";

/// Settings shared by the binary and the persistence layer.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKDESK")]
pub struct TaskdeskSettings {
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_size: Option<u32>,
    /// `tracing` filter directive, for example `taskdesk=debug`.
    pub log_filter: Option<String>,
    /// Emit JSON log lines instead of human-readable ones.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl TaskdeskSettings {
    /// Returns the configured database URL, if any.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Returns the pool size, falling back to the default.
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Returns the log filter, falling back to `info`.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
