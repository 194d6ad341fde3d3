// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Renderable kind of a field, stored by name in the `data_types` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKind {
    Text,
    Number,
    Date,
    CheckBox,
    Dropdown,
    Radio,
}

impl DataKind {
    /// All kinds in the order they get seeded into an empty store.
    pub const ALL: [DataKind; 6] = [
        DataKind::Text,
        DataKind::Number,
        DataKind::Date,
        DataKind::CheckBox,
        DataKind::Dropdown,
        DataKind::Radio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Text => "Text",
            DataKind::Number => "Number",
            DataKind::Date => "Date",
            DataKind::CheckBox => "CheckBox",
            DataKind::Dropdown => "Dropdown",
            DataKind::Radio => "Radio",
        }
    }

    /// Returns true for kinds which render their options from a collection.
    pub fn is_option_based(&self) -> bool {
        matches!(
            self,
            DataKind::CheckBox | DataKind::Dropdown | DataKind::Radio
        )
    }
}

impl Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DataKind::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown data type '{}'", value))
    }
}

/// Renderable kind a field can have (Text, Number, Date, CheckBox, Dropdown or Radio).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    pub id: Id,
    pub data_type: String,
}

impl DataType {
    /// Returns the known kind behind the stored name, if any.
    pub fn kind(&self) -> Option<DataKind> {
        self.data_type.parse().ok()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewDataType {
    pub data_type: String,
}

impl From<DataKind> for NewDataType {
    fn from(kind: DataKind) -> Self {
        Self {
            data_type: kind.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DataTypePatch {
    pub data_type: Option<String>,
}

impl Patch<DataType> for DataTypePatch {
    fn apply(self, record: &mut DataType) {
        if let Some(data_type) = self.data_type {
            record.data_type = data_type;
        }
    }
}

impl Record for DataType {
    const TABLE: TableName = TableName::DataTypes;
    type New = NewDataType;
    type Patch = DataTypePatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewDataType) -> Self {
        Self {
            id,
            data_type: new.data_type,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.data_types
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.data_types
    }
}
