// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::composition::{self, FormLayout};
use crate::db::errors::StoreError;
use crate::db::models::{Form, FormField};
use crate::db::{Id, MemoryStore};

impl MemoryStore {
    /// Returns all forms offered for a service.
    pub fn forms_by_service(&self, service_id: Id) -> Vec<Form> {
        self.read(|tables| tables.forms.filter(|form| form.service_id == service_id))
    }

    /// Returns the form fields placed in a form, in insertion order.
    pub fn form_fields_by_form(&self, form_id: Id) -> Vec<FormField> {
        self.read(|tables| composition::fields_by_form(tables, form_id))
    }

    /// Returns the renderable layout of a form.
    pub fn form_layout(&self, form_id: Id) -> Result<FormLayout, StoreError> {
        self.read(|tables| composition::form_layout(tables, form_id))
    }
}
