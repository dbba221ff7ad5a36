use serde::{Deserialize, Serialize};

/// Server settings, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    /// SQLite file path. `None` means `<data dir>/spacemarks.db`.
    pub database_path: Option<String>,
    /// Requests accepted per one-second window before answering `TOO_MANY_REQUESTS`.
    pub rate_limit_per_second: u32,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            rate_limit_per_second: 200,
            log_filter: "info".to_string(),
        }
    }
}
