// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::models::nullable;
use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Citizen or administrator account.
///
/// The password is kept as handed over, checking credentials is left to the surrounding
/// application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub surname: String,
    pub dob: NaiveDate,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub surname: String,
    pub dob: NaiveDate,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub middle_name: Option<Option<String>>,
    pub surname: Option<String>,
    pub dob: Option<NaiveDate>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Patch<User> for UserPatch {
    fn apply(self, record: &mut User) {
        if let Some(first_name) = self.first_name {
            record.first_name = first_name;
        }
        if let Some(middle_name) = self.middle_name {
            record.middle_name = middle_name;
        }
        if let Some(surname) = self.surname {
            record.surname = surname;
        }
        if let Some(dob) = self.dob {
            record.dob = dob;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(password) = self.password {
            record.password = password;
        }
    }
}

impl Record for User {
    const TABLE: TableName = TableName::Users;
    type New = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewUser) -> Self {
        Self {
            id,
            first_name: new.first_name,
            middle_name: new.middle_name,
            surname: new.surname,
            dob: new.dob,
            email: new.email,
            password: new.password,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.users
    }
}
