// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory entity store of the form portal.
//!
//! The main interface is [`MemoryStore`]: generic create, read, update and delete operations on
//! every table via the [`Record`] trait, plus the derived queries living in `stores`. All
//! operations are synchronous and run under one lock, which gives single-writer semantics to the
//! HTTP handlers sharing a store.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod models;
mod snapshot;
mod stores;
mod table;

pub use table::{Id, Patch, Record, Table, TableName};

use crate::db::errors::StoreError;
use crate::db::models::{
    Collection, CollectionItem, DataKind, DataType, Field, Form, FormAnswer, FormField, FormGroup,
    Group, NewDataType, ReservedName, Service, Submission, User,
};

/// All tables of the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub groups: Table<Group>,
    pub data_types: Table<DataType>,
    pub fields: Table<Field>,
    pub collections: Table<Collection>,
    pub collection_items: Table<CollectionItem>,
    pub services: Table<Service>,
    pub forms: Table<Form>,
    pub form_groups: Table<FormGroup>,
    pub form_fields: Table<FormField>,
    pub users: Table<User>,
    pub submissions: Table<Submission>,
    pub form_answers: Table<FormAnswer>,
    pub reserved_names: Table<ReservedName>,
}

impl Tables {
    /// Stores a new record with the next id of its table.
    pub fn insert<R: Record>(&mut self, new: R::New) -> Result<R, StoreError> {
        let record = R::from_new(R::table(self).next_id(), new);
        record.check(self)?;
        R::table_mut(self).push(record.clone());
        Ok(record)
    }

    pub fn get<R: Record>(&self, id: Id) -> Result<&R, StoreError> {
        R::table(self).get(id).ok_or(StoreError::NotFound {
            table: R::TABLE,
            id,
        })
    }

    /// Merges a partial update over an existing record.
    pub fn update<R: Record>(&mut self, id: Id, patch: R::Patch) -> Result<R, StoreError> {
        let mut record = self.get::<R>(id)?.clone();
        patch.apply(&mut record);
        record.check(self)?;
        R::table_mut(self).replace(record.clone());
        Ok(record)
    }

    pub fn delete<R: Record>(&mut self, id: Id) -> Result<R, StoreError> {
        R::table_mut(self).remove(id).ok_or(StoreError::NotFound {
            table: R::TABLE,
            id,
        })
    }
}

/// Entity store holding all tables in memory.
///
/// Cloning the store is cheap and every clone operates on the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Returns an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a store operating on already populated tables.
    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Tables stay consistent after a panic in another holder, all mutations are single `Vec`
        // operations
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a read-only operation on the tables.
    pub(crate) fn read<T, F>(&self, operation: F) -> T
    where
        F: FnOnce(&Tables) -> T,
    {
        operation(&*self.lock())
    }

    /// Runs an operation spanning multiple writes: either all of them get applied or, when the
    /// operation fails, the tables are restored to the state before it started.
    pub(crate) fn transaction<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Tables) -> Result<T, StoreError>,
    {
        let mut tables = self.lock();
        let before = tables.clone();

        operation(&mut *tables).map_err(|err| {
            debug!("Rolling back transaction: {}", err);
            *tables = before;
            err
        })
    }

    /// Returns a copy of all tables.
    pub fn tables(&self) -> Tables {
        self.lock().clone()
    }

    /// Stores a new record and returns it with its assigned id.
    pub fn create<R: Record>(&self, new: R::New) -> Result<R, StoreError> {
        let record = self.lock().insert::<R>(new)?;
        debug!("Created record {} in {}", record.id(), R::TABLE);
        Ok(record)
    }

    /// Returns copies of all records of a table in insertion order.
    pub fn get_all<R: Record>(&self) -> Vec<R> {
        self.read(|tables| R::table(tables).rows().to_vec())
    }

    pub fn get<R: Record>(&self, id: Id) -> Result<R, StoreError> {
        self.read(|tables| tables.get::<R>(id).cloned())
    }

    /// Merges a partial update over the record with the given id and returns the merged record.
    pub fn update<R: Record>(&self, id: Id, patch: R::Patch) -> Result<R, StoreError> {
        let record = self.lock().update::<R>(id, patch)?;
        debug!("Updated record {} in {}", id, R::TABLE);
        Ok(record)
    }

    /// Removes the record with the given id.
    pub fn delete<R: Record>(&self, id: Id) -> Result<(), StoreError> {
        self.lock().delete::<R>(id)?;
        debug!("Deleted record {} from {}", id, R::TABLE);
        Ok(())
    }

    /// Fills an empty `data_types` table with all known data kinds.
    ///
    /// Returns the created records, nothing gets created when the table already holds data.
    pub fn seed_data_types(&self) -> Result<Vec<DataType>, StoreError> {
        self.transaction(|tables| {
            if !tables.data_types.is_empty() {
                return Ok(Vec::new());
            }

            DataKind::ALL
                .iter()
                .map(|kind| tables.insert::<DataType>(NewDataType::from(*kind)))
                .collect()
        })
    }
}
