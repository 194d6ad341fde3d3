// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Entry of the reserved-name registry proposed names get checked against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedName {
    pub id: Id,
    pub reserved_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewReservedName {
    pub reserved_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReservedNamePatch {
    pub reserved_name: Option<String>,
}

impl Patch<ReservedName> for ReservedNamePatch {
    fn apply(self, record: &mut ReservedName) {
        if let Some(reserved_name) = self.reserved_name {
            record.reserved_name = reserved_name;
        }
    }
}

impl Record for ReservedName {
    const TABLE: TableName = TableName::ReservedNames;
    type New = NewReservedName;
    type Patch = ReservedNamePatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewReservedName) -> Self {
        Self {
            id,
            reserved_name: new.reserved_name,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.reserved_names
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.reserved_names
    }
}
