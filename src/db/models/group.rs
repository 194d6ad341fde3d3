// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Logical category for fields, for example "Person" or "Address".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub group_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGroup {
    pub group_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GroupPatch {
    pub group_name: Option<String>,
}

impl Patch<Group> for GroupPatch {
    fn apply(self, record: &mut Group) {
        if let Some(group_name) = self.group_name {
            record.group_name = group_name;
        }
    }
}

impl Record for Group {
    const TABLE: TableName = TableName::Groups;
    type New = NewGroup;
    type Patch = GroupPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewGroup) -> Self {
        Self {
            id,
            group_name: new.group_name,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.groups
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.groups
    }
}
