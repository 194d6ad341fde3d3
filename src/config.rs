// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default port of the HTTP API.
pub const DEFAULT_HTTP_PORT: u16 = 2020;

/// Default capacity of the internal broadcast channel used to communicate between services.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Configuration object holding all important variables throughout the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// HTTP port, serving the REST API (for example hosted under
    /// http://localhost:2020/api/forms). Defaults to 2020.
    pub http_port: u16,

    /// Path of the JSON file all tables are persisted to.
    ///
    /// The file is read on start and rewritten after every change. When not set nothing gets
    /// persisted and all data is lost after shutdown.
    pub snapshot_path: Option<PathBuf>,

    /// Fill an empty `data_types` table with the known data kinds on start. Enabled by default.
    pub seed_data_types: bool,

    /// Maximum number of messages buffered on the communication bus between services.
    pub bus_capacity: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            snapshot_path: None,
            seed_data_types: true,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Configuration;

    #[test]
    fn fills_missing_values_with_defaults() {
        let config: Configuration =
            serde_json::from_str(r#"{ "snapshot_path": "/var/lib/formportal/tables.json" }"#)
                .unwrap();

        assert_eq!(
            config,
            Configuration {
                snapshot_path: Some(PathBuf::from("/var/lib/formportal/tables.json")),
                ..Configuration::default()
            }
        );
        assert_eq!(config.http_port, 2020);
        assert!(config.seed_data_types);
    }
}
