// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::models::Field;
use crate::db::{Id, MemoryStore};

impl MemoryStore {
    /// Returns all fields categorized under a group.
    pub fn fields_by_group(&self, group_id: Id) -> Vec<Field> {
        self.read(|tables| {
            tables
                .fields
                .filter(|field| field.group_id == Some(group_id))
        })
    }
}
