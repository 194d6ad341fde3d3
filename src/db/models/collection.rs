// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::db::errors::StoreError;
use crate::db::models::nullable;
use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Named option set, for example "Country".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Id,
    pub collection_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCollection {
    pub collection_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollectionPatch {
    pub collection_name: Option<String>,
}

impl Patch<Collection> for CollectionPatch {
    fn apply(self, record: &mut Collection) {
        if let Some(collection_name) = self.collection_name {
            record.collection_name = collection_name;
        }
    }
}

impl Record for Collection {
    const TABLE: TableName = TableName::Collections;
    type New = NewCollection;
    type Patch = CollectionPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewCollection) -> Self {
        Self {
            id,
            collection_name: new.collection_name,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.collections
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.collections
    }
}

/// One option of a collection.
///
/// `relation_collection_items_id` optionally points at a parent item living in another
/// collection (a province pointing at its country), which is what cascading selects filter on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub id: Id,
    pub collection_id: Id,
    pub collection_item: String,
    #[serde(default)]
    pub relation_collection_items_id: Option<Id>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCollectionItem {
    pub collection_id: Id,
    pub collection_item: String,
    #[serde(default)]
    pub relation_collection_items_id: Option<Id>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollectionItemPatch {
    pub collection_id: Option<Id>,
    pub collection_item: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub relation_collection_items_id: Option<Option<Id>>,
}

impl Patch<CollectionItem> for CollectionItemPatch {
    fn apply(self, record: &mut CollectionItem) {
        if let Some(collection_id) = self.collection_id {
            record.collection_id = collection_id;
        }
        if let Some(collection_item) = self.collection_item {
            record.collection_item = collection_item;
        }
        if let Some(relation_collection_items_id) = self.relation_collection_items_id {
            record.relation_collection_items_id = relation_collection_items_id;
        }
    }
}

impl Record for CollectionItem {
    const TABLE: TableName = TableName::CollectionItems;
    type New = NewCollectionItem;
    type Patch = CollectionItemPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewCollectionItem) -> Self {
        Self {
            id,
            collection_id: new.collection_id,
            collection_item: new.collection_item,
            relation_collection_items_id: new.relation_collection_items_id,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.collection_items
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.collection_items
    }

    /// A parent item must belong to a different collection than its child and an item is never
    /// its own parent. Parents which do not exist (yet) are accepted like any other dangling
    /// reference.
    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        // Not stored yet on insert, the lookup below would miss it
        if self.relation_collection_items_id == Some(self.id) {
            return Err(StoreError::InvalidRecord {
                table: Self::TABLE,
                reason: format!("item {} can not be its own parent", self.id),
            });
        }

        let parent = self
            .relation_collection_items_id
            .and_then(|parent_id| tables.collection_items.get(parent_id));

        match parent {
            Some(parent) if parent.collection_id == self.collection_id => {
                Err(StoreError::InvalidRecord {
                    table: Self::TABLE,
                    reason: format!(
                        "parent item {} belongs to the same collection {}",
                        parent.id, self.collection_id
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}
