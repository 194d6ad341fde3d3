// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::{self, Debug, Display};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::errors::StoreError;
use crate::db::Tables;

/// Identifier of a record, unique within its table.
pub type Id = u64;

/// Names of all tables held by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Groups,
    DataTypes,
    Fields,
    Collections,
    CollectionItems,
    Services,
    Forms,
    FormGroups,
    FormFields,
    Users,
    Submissions,
    FormAnswers,
    ReservedNames,
}

impl TableName {
    /// Returns the table name as used in snapshots and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Groups => "groups",
            TableName::DataTypes => "data_types",
            TableName::Fields => "fields",
            TableName::Collections => "collections",
            TableName::CollectionItems => "collection_items",
            TableName::Services => "services",
            TableName::Forms => "forms",
            TableName::FormGroups => "form_groups",
            TableName::FormFields => "form_fields",
            TableName::Users => "users",
            TableName::Submissions => "submissions",
            TableName::FormAnswers => "form_answers",
            TableName::ReservedNames => "reserved_names",
        }
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row type which can be kept in one of the store's tables.
///
/// Every record knows how to build itself from a create payload (everything except the id) and
/// which partial update payload can be merged over it.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table this record lives in.
    const TABLE: TableName;

    /// Create payload, all fields of the record except its id.
    type New: DeserializeOwned + Send + 'static;

    /// Partial update payload.
    type Patch: Patch<Self> + DeserializeOwned + Send + 'static;

    fn id(&self) -> Id;

    /// Builds the record from the id assigned by the store and the create payload.
    fn from_new(id: Id, new: Self::New) -> Self;

    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Checks invariants spanning other records before the record gets stored.
    fn check(&self, _tables: &Tables) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Partial update which can be merged over a record.
///
/// Fields which are not present in the patch leave the record unchanged.
pub trait Patch<R> {
    fn apply(self, record: &mut R);
}

/// Rows of one table in insertion order, together with the id counter of that table.
#[derive(Clone, Debug)]
pub struct Table<R> {
    rows: Vec<R>,
    next_id: Id,
}

impl<R: Record> Table<R> {
    /// Returns an empty table, the first record will receive id 1.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Restores a table from existing rows.
    ///
    /// The id counter is seeded to one above the highest id, or kept at a persisted counter value
    /// when that one is higher (ids of deleted records are never handed out again).
    pub fn restore(rows: Vec<R>, next_id: Option<Id>) -> Self {
        let seeded = rows.iter().map(Record::id).max().map_or(1, |max| max + 1);

        Self {
            rows,
            next_id: next_id.map_or(seeded, |next_id| next_id.max(seeded)),
        }
    }

    /// Id which will be assigned to the next inserted record.
    pub fn next_id(&self) -> Id {
        self.next_id
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    /// Appends a record and moves the id counter past its id.
    pub fn push(&mut self, record: R) {
        self.next_id = self.next_id.max(record.id() + 1);
        self.rows.push(record);
    }

    /// Replaces the record with the same id in place, returns false when there is none.
    pub fn replace(&mut self, record: R) -> bool {
        match self.rows.iter_mut().find(|row| row.id() == record.id()) {
            Some(row) => {
                *row = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Id) -> Option<R> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(index))
    }

    /// Removes all records matching the predicate and returns how many were removed.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&R) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| !predicate(row));
        before - self.rows.len()
    }

    /// Returns copies of all records matching the predicate, in insertion order.
    pub fn filter<F>(&self, predicate: F) -> Vec<R>
    where
        F: Fn(&R) -> bool,
    {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct TableSnapshotRef<'a, R> {
    next_id: Id,
    rows: &'a [R],
}

#[derive(Deserialize)]
struct TableSnapshot<R> {
    #[serde(default)]
    next_id: Option<Id>,
    rows: Vec<R>,
}

impl<R: Record> Serialize for Table<R> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TableSnapshotRef {
            next_id: self.next_id,
            rows: &self.rows,
        }
        .serialize(serializer)
    }
}

impl<'de, R: Record> Deserialize<'de> for Table<R> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let snapshot = TableSnapshot::<R>::deserialize(deserializer)?;
        Ok(Table::restore(snapshot.rows, snapshot.next_id))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use crate::db::models::{NewReservedName, ReservedName};
    use crate::db::Record;

    use super::Table;

    fn reserved(id: u64) -> ReservedName {
        ReservedName::from_new(
            id,
            NewReservedName {
                reserved_name: format!("name {}", id),
            },
        )
    }

    #[rstest]
    #[case::empty(vec![], None, 1)]
    #[case::max_plus_one(vec![1, 7, 3], None, 8)]
    #[case::persisted_counter_wins(vec![1, 2], Some(10), 10)]
    #[case::rows_win_over_stale_counter(vec![4, 9], Some(3), 10)]
    fn restores_id_counter(
        #[case] ids: Vec<u64>,
        #[case] next_id: Option<u64>,
        #[case] expected: u64,
    ) {
        let rows = ids.into_iter().map(reserved).collect();
        let table = Table::restore(rows, next_id);
        assert_eq!(table.next_id(), expected);
    }

    #[test]
    fn snapshot_keeps_counter_after_delete() {
        let mut table = Table::new();
        table.push(reserved(1));
        table.push(reserved(2));
        table.remove(2);

        let json = serde_json::to_string(&table).unwrap();
        let restored: Table<ReservedName> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.next_id(), 3);
    }

    #[test]
    fn snapshot_without_counter_is_seeded_from_rows() {
        let restored: Table<ReservedName> = serde_json::from_str(
            r#"{ "rows": [{ "id": 5, "reserved_name": "PACRA" }] }"#,
        )
        .unwrap();

        assert_eq!(restored.next_id(), 6);
        assert_eq!(restored.get(5).unwrap().reserved_name, "PACRA");
    }

    proptest! {
        #[test]
        fn push_and_remove_never_moves_counter_back(removals in prop::collection::vec(1u64..20, 0..20)) {
            let mut table = Table::new();
            for id in 1..=20 {
                table.push(reserved(id));
            }

            for id in removals {
                table.remove(id);
                prop_assert_eq!(table.next_id(), 21);
            }
        }
    }
}
