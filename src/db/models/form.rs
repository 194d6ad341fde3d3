// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::db::models::nullable;
use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Data-entry form belonging to exactly one service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: Id,
    pub form_name: String,
    #[serde(default)]
    pub description: String,
    pub service_id: Id,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewForm {
    pub form_name: String,
    #[serde(default)]
    pub description: String,
    pub service_id: Id,
    pub status: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormPatch {
    pub form_name: Option<String>,
    pub description: Option<String>,
    pub service_id: Option<Id>,
    pub status: Option<String>,
}

impl Patch<Form> for FormPatch {
    fn apply(self, record: &mut Form) {
        if let Some(form_name) = self.form_name {
            record.form_name = form_name;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(service_id) = self.service_id {
            record.service_id = service_id;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

impl Record for Form {
    const TABLE: TableName = TableName::Forms;
    type New = NewForm;
    type Patch = FormPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewForm) -> Self {
        Self {
            id,
            form_name: new.form_name,
            description: new.description,
            service_id: new.service_id,
            status: new.status,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.forms
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.forms
    }
}

/// Layout section inside a form, for example "Applicant" or "Proposed Names".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormGroup {
    pub id: Id,
    pub group_name: String,
    #[serde(default)]
    pub group_span: u32,
    #[serde(default)]
    pub group_row: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewFormGroup {
    pub group_name: String,
    #[serde(default)]
    pub group_span: u32,
    #[serde(default)]
    pub group_row: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormGroupPatch {
    pub group_name: Option<String>,
    pub group_span: Option<u32>,
    pub group_row: Option<u32>,
}

impl Patch<FormGroup> for FormGroupPatch {
    fn apply(self, record: &mut FormGroup) {
        if let Some(group_name) = self.group_name {
            record.group_name = group_name;
        }
        if let Some(group_span) = self.group_span {
            record.group_span = group_span;
        }
        if let Some(group_row) = self.group_row {
            record.group_row = group_row;
        }
    }
}

impl Record for FormGroup {
    const TABLE: TableName = TableName::FormGroups;
    type New = NewFormGroup;
    type Patch = FormGroupPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewFormGroup) -> Self {
        Self {
            id,
            group_name: new.group_name,
            group_span: new.group_span,
            group_row: new.group_row,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.form_groups
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.form_groups
    }
}

/// One placed instance of a `Field` inside a form.
///
/// The same field can be placed several times in one form ("Proposed Name 1", "Proposed Name
/// 2", ..), every instance with its own label override, validation tag and layout slot. An empty
/// `field_name` means the label of the underlying field is shown. `validation` is kept exactly as
/// handed over, see `Validation` for its interpretation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: Id,
    pub form_id: Id,
    pub field_id: Id,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub validation: String,
    #[serde(default)]
    pub field_span: u32,
    #[serde(default)]
    pub field_row: u32,
    #[serde(default)]
    pub form_group_id: Option<Id>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewFormField {
    pub form_id: Id,
    pub field_id: Id,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub validation: String,
    #[serde(default)]
    pub field_span: u32,
    #[serde(default)]
    pub field_row: u32,
    #[serde(default)]
    pub form_group_id: Option<Id>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormFieldPatch {
    pub form_id: Option<Id>,
    pub field_id: Option<Id>,
    pub field_name: Option<String>,
    pub validation: Option<String>,
    pub field_span: Option<u32>,
    pub field_row: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub form_group_id: Option<Option<Id>>,
}

impl Patch<FormField> for FormFieldPatch {
    fn apply(self, record: &mut FormField) {
        if let Some(form_id) = self.form_id {
            record.form_id = form_id;
        }
        if let Some(field_id) = self.field_id {
            record.field_id = field_id;
        }
        if let Some(field_name) = self.field_name {
            record.field_name = field_name;
        }
        if let Some(validation) = self.validation {
            record.validation = validation;
        }
        if let Some(field_span) = self.field_span {
            record.field_span = field_span;
        }
        if let Some(field_row) = self.field_row {
            record.field_row = field_row;
        }
        if let Some(form_group_id) = self.form_group_id {
            record.form_group_id = form_group_id;
        }
    }
}

impl Record for FormField {
    const TABLE: TableName = TableName::FormFields;
    type New = NewFormField;
    type Patch = FormFieldPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewFormField) -> Self {
        Self {
            id,
            form_id: new.form_id,
            field_id: new.field_id,
            field_name: new.field_name,
            validation: new.validation,
            field_span: new.field_span,
            field_row: new.field_row,
            form_group_id: new.form_group_id,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.form_fields
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.form_fields
    }
}
