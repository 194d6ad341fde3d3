// SPDX-License-Identifier: AGPL-3.0-or-later

//! Resolves forms into their placed fields, labels, options and layout sections.
use serde::{Deserialize, Serialize};

use crate::db::errors::StoreError;
use crate::db::models::{CollectionItem, DataType, Field, Form, FormField, FormGroup};
use crate::db::{Id, Tables};
use crate::validation::Validation;

/// Returns all form fields of a form in insertion order.
///
/// Rows and spans of legacy forms are often all zero, sorting by them is left to the renderer.
pub fn fields_by_form(tables: &Tables, form_id: Id) -> Vec<FormField> {
    tables
        .form_fields
        .filter(|form_field| form_field.form_id == form_id)
}

/// Label to show for a placed field: the form field's own name when set, otherwise the label of
/// the underlying field.
///
/// Falls back to the (empty) form field name when the underlying field does not exist.
pub fn resolve_label<'a>(form_field: &'a FormField, field: Option<&'a Field>) -> &'a str {
    if !form_field.field_name.trim().is_empty() {
        return &form_field.field_name;
    }

    field.map_or(&form_field.field_name, |field| &field.label)
}

/// Returns the items of a collection, optionally only the ones depending on a parent item of
/// another collection (provinces of the selected country).
pub fn collection_items(
    tables: &Tables,
    collection_id: Id,
    parent_item_id: Option<Id>,
) -> Vec<CollectionItem> {
    tables.collection_items.filter(|item| {
        item.collection_id == collection_id
            && parent_item_id.map_or(true, |parent_id| {
                item.relation_collection_items_id == Some(parent_id)
            })
    })
}

/// Field placed in a form, ready to be rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutField {
    pub form_field: FormField,

    /// Label after applying the form field override.
    pub label: String,

    pub validation: Validation,

    /// Underlying field definition, absent when the form field points at a missing field.
    pub field: Option<Field>,

    /// Options of option-based fields, empty for all other kinds even when a collection is set.
    pub options: Vec<CollectionItem>,
}

/// Section of a form layout, `form_group` is absent for fields without (existing) section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutGroup {
    pub form_group: Option<FormGroup>,
    pub fields: Vec<LayoutField>,
}

/// Renderable shape of a form: its placed fields bucketed by form group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    pub form: Form,
    pub groups: Vec<LayoutGroup>,
}

fn layout_field(tables: &Tables, form_field: FormField) -> LayoutField {
    let field = tables.fields.get(form_field.field_id).cloned();
    let label = resolve_label(&form_field, field.as_ref()).to_owned();

    let options = field
        .as_ref()
        .filter(|field| {
            tables
                .data_types
                .get(field.data_type_id)
                .and_then(DataType::kind)
                .map_or(false, |kind| kind.is_option_based())
        })
        .and_then(|field| field.collection_id)
        .map(|collection_id| collection_items(tables, collection_id, None))
        .unwrap_or_default();

    LayoutField {
        validation: Validation::parse(&form_field.validation),
        form_field,
        label,
        field,
        options,
    }
}

/// Builds the layout of a form.
///
/// Groups appear in the order their first field was placed and keep their fields in insertion
/// order. Fields without form group, or pointing at a missing one, share one group without
/// `form_group`.
pub fn form_layout(tables: &Tables, form_id: Id) -> Result<FormLayout, StoreError> {
    let form = tables.get::<Form>(form_id)?.clone();
    let mut groups: Vec<LayoutGroup> = Vec::new();

    for form_field in fields_by_form(tables, form_id) {
        let form_group = form_field
            .form_group_id
            .and_then(|id| tables.form_groups.get(id))
            .cloned();
        let group_id = form_group.as_ref().map(|group| group.id);
        let field = layout_field(tables, form_field);

        match groups
            .iter_mut()
            .find(|group| group.form_group.as_ref().map(|group| group.id) == group_id)
        {
            Some(group) => group.fields.push(field),
            None => groups.push(LayoutGroup {
                form_group,
                fields: vec![field],
            }),
        }
    }

    Ok(FormLayout { form, groups })
}
