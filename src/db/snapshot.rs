// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::db::errors::{SnapshotError, StoreError};
use crate::db::{MemoryStore, Tables};

impl MemoryStore {
    /// Loads a store from a JSON snapshot file.
    ///
    /// Returns an empty store when the file does not exist yet. Tables missing in the snapshot
    /// start out empty, id counters of present tables continue after their highest id.
    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            info!("No snapshot found at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let json = fs::read_to_string(path).map_err(SnapshotError::from)?;
        let tables: Tables = serde_json::from_str(&json).map_err(SnapshotError::from)?;
        info!("Loaded snapshot from {}", path.display());

        Ok(Self::from_tables(tables))
    }

    /// Writes all tables into a JSON snapshot file.
    ///
    /// The snapshot is written next to the target first and then moved into place, so readers
    /// never see a partially written file.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        let json = self
            .read(serde_json::to_string_pretty::<Tables>)
            .map_err(SnapshotError::from)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SnapshotError::from)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(SnapshotError::from)?;
        fs::rename(&tmp_path, path).map_err(SnapshotError::from)?;
        debug!("Wrote snapshot to {}", path.display());

        Ok(())
    }
}
