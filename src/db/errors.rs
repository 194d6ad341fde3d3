// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::{Id, TableName};

/// Errors returned by `MemoryStore` operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No record with the given id exists in the table.
    #[error("No record with id {id} found in table {table}")]
    NotFound { table: TableName, id: Id },

    /// Record violates an invariant spanning other records.
    #[error("Invalid record in table {table}: {reason}")]
    InvalidRecord { table: TableName, reason: String },

    /// Reading or writing the snapshot file failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl StoreError {
    /// Returns true when this error was caused by a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors which can occur when loading or persisting a store snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("Could not access snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode or decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
