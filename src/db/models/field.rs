// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::db::models::nullable;
use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Reusable data-point definition which forms place as `FormField` instances.
///
/// `collection_id` points at the option set of option-based kinds (Dropdown, Radio, CheckBox).
/// None of the foreign keys are checked when the field gets stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: Id,
    pub label: String,
    pub data_type_id: Id,
    #[serde(default)]
    pub group_id: Option<Id>,
    pub status: String,
    #[serde(default)]
    pub collection_id: Option<Id>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewField {
    pub label: String,
    pub data_type_id: Id,
    #[serde(default)]
    pub group_id: Option<Id>,
    pub status: String,
    #[serde(default)]
    pub collection_id: Option<Id>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub data_type_id: Option<Id>,
    #[serde(default, deserialize_with = "nullable")]
    pub group_id: Option<Option<Id>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub collection_id: Option<Option<Id>>,
}

impl Patch<Field> for FieldPatch {
    fn apply(self, record: &mut Field) {
        if let Some(label) = self.label {
            record.label = label;
        }
        if let Some(data_type_id) = self.data_type_id {
            record.data_type_id = data_type_id;
        }
        if let Some(group_id) = self.group_id {
            record.group_id = group_id;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(collection_id) = self.collection_id {
            record.collection_id = collection_id;
        }
    }
}

impl Record for Field {
    const TABLE: TableName = TableName::Fields;
    type New = NewField;
    type Patch = FieldPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewField) -> Self {
        Self {
            id,
            label: new.label,
            data_type_id: new.data_type_id,
            group_id: new.group_id,
            status: new.status,
            collection_id: new.collection_id,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.fields
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.fields
    }
}
