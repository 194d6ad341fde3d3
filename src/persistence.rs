// SPDX-License-Identifier: AGPL-3.0-or-later

//! Keeps the snapshot file in sync with the tables.
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::task;

use crate::bus::{ServiceMessage, ServiceSender};
use crate::context::Context;
use crate::db::MemoryStore;
use crate::manager::Shutdown;

async fn write_snapshot(store: &MemoryStore, path: &Path) -> Result<()> {
    let store = store.clone();
    let path: PathBuf = path.to_path_buf();
    task::spawn_blocking(move || store.save_snapshot(&path)).await??;
    Ok(())
}

/// Rewrites the snapshot file after every change of a table and once more on shutdown.
///
/// Idles until shutdown when no snapshot path is configured.
pub async fn snapshot_service(
    context: Context,
    mut shutdown: Shutdown,
    tx: ServiceSender,
) -> Result<()> {
    let path = match &context.config.snapshot_path {
        Some(path) => path.clone(),
        None => {
            debug!("No snapshot path configured, data will not be persisted");
            shutdown.await.ok();
            return Ok(());
        }
    };

    let mut rx = tx.subscribe();

    loop {
        tokio::select! {
            message = rx.recv() => match message {
                Ok(ServiceMessage::TableChanged(table)) => {
                    debug!("Table {} changed, writing snapshot", table);
                    write_snapshot(&context.store, &path).await?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Snapshot service missed {} bus messages", skipped);
                    write_snapshot(&context.store, &path).await?;
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => break,
        }
    }

    write_snapshot(&context.store, &path).await?;
    info!("Wrote snapshot to {}", path.display());

    Ok(())
}
