// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Top-level offering citizens apply for, for example "Name Clearance".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Id,
    pub service_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewService {
    pub service_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServicePatch {
    pub service_name: Option<String>,
}

impl Patch<Service> for ServicePatch {
    fn apply(self, record: &mut Service) {
        if let Some(service_name) = self.service_name {
            record.service_name = service_name;
        }
    }
}

impl Record for Service {
    const TABLE: TableName = TableName::Services;
    type New = NewService;
    type Patch = ServicePatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewService) -> Self {
        Self {
            id,
            service_name: new.service_name,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.services
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.services
    }
}
