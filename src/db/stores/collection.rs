// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::composition;
use crate::db::models::CollectionItem;
use crate::db::{Id, MemoryStore};

impl MemoryStore {
    /// Returns the items of a collection, optionally only those whose parent item is
    /// `parent_item_id`.
    pub fn collection_items_by_collection(
        &self,
        collection_id: Id,
        parent_item_id: Option<Id>,
    ) -> Vec<CollectionItem> {
        self.read(|tables| composition::collection_items(tables, collection_id, parent_item_id))
    }
}
