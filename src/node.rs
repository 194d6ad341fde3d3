// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::{bail, Context as _, Result};
use log::info;

use crate::bus::ServiceMessage;
use crate::config::Configuration;
use crate::context::Context;
use crate::db::MemoryStore;
use crate::http::http_service;
use crate::manager::ServiceManager;
use crate::persistence::snapshot_service;

/// Loads the store from the configured snapshot and seeds default data, ready to be served.
fn initialize_store(config: &Configuration) -> Result<MemoryStore> {
    let store = match &config.snapshot_path {
        Some(path) => {
            info!("Loading snapshot from {}", path.display());
            MemoryStore::load_snapshot(path)
                .with_context(|| format!("Could not load snapshot {}", path.display()))?
        }
        None => MemoryStore::new(),
    };

    if config.seed_data_types {
        let seeded = store.seed_data_types()?;
        if !seeded.is_empty() {
            info!("Seeded {} data types", seeded.len());
        }
    }

    Ok(store)
}

/// Main runtime managing the form portal process.
#[allow(missing_debug_implementations)]
pub struct Node {
    manager: ServiceManager<Context, ServiceMessage>,
}

impl Node {
    /// Start the form portal with your configuration. This method can be used to run the portal
    /// within other applications.
    pub async fn start(config: Configuration) -> Result<Self> {
        if config.bus_capacity == 0 {
            bail!("Bus capacity needs to be at least 1");
        }

        let store = initialize_store(&config)?;

        // Create service manager with shared data between services
        let bus_capacity = config.bus_capacity;
        let context = Context::new(store, config);
        let mut manager = ServiceManager::<Context, ServiceMessage>::new(bus_capacity, context);

        // Persist tables after every change
        manager.add("snapshot", snapshot_service);

        // Start HTTP server with REST API
        manager.add("http", http_service);

        Ok(Self { manager })
    }

    /// This future resolves when at least one service stopped.
    ///
    /// It can be used to exit the application as a stopped service usually means that something
    /// went wrong.
    pub async fn on_exit(&self) {
        self.manager.on_exit().await;
    }

    /// Close all running concurrent tasks and wait until they are fully shut down.
    pub async fn shutdown(self) {
        self.manager.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use tempfile::TempDir;

    use crate::config::Configuration;
    use crate::db::models::{DataType, Group, NewGroup};
    use crate::db::MemoryStore;

    use super::{initialize_store, Node};

    #[test]
    fn seeds_data_types_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tables.json");
        let config = Configuration {
            snapshot_path: Some(path.clone()),
            ..Configuration::default()
        };

        let store = initialize_store(&config).unwrap();
        assert_eq!(store.get_all::<DataType>().len(), 6);
        store
            .create::<Group>(NewGroup {
                group_name: "Company".into(),
            })
            .unwrap();
        store.save_snapshot(&path).unwrap();

        let restored = initialize_store(&config).unwrap();
        assert_eq!(restored.get_all::<DataType>().len(), 6);
        assert_eq!(restored.get_all::<Group>().len(), 1);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let config = Configuration {
            seed_data_types: false,
            ..Configuration::default()
        };

        let store = initialize_store(&config).unwrap();
        assert!(store.get_all::<DataType>().is_empty());
    }

    #[test]
    fn fails_on_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tables.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = Configuration {
            snapshot_path: Some(path),
            ..Configuration::default()
        };

        assert!(initialize_store(&config).is_err());
    }

    #[tokio::test]
    async fn refuses_to_start_without_bus_capacity() {
        let config = Configuration {
            bus_capacity: 0,
            seed_data_types: false,
            ..Configuration::default()
        };

        assert!(Node::start(config).await.is_err());
    }

    #[tokio::test]
    async fn persists_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tables.json");

        // Find a free port for the HTTP service
        let http_port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let config = Configuration {
            http_port,
            snapshot_path: Some(path.clone()),
            ..Configuration::default()
        };

        let node = Node::start(config).await.unwrap();
        node.shutdown().await;

        let restored = MemoryStore::load_snapshot(&path).unwrap();
        assert_eq!(restored.get_all::<DataType>().len(), 6);
    }
}
