// SPDX-License-Identifier: AGPL-3.0-or-later

use rstest::fixture;

use crate::db::models::{
    Collection, CollectionItem, DataKind, DataType, Field, Form, FormField, FormGroup, Group,
    NewCollection, NewCollectionItem, NewField, NewForm, NewFormField, NewFormGroup, NewGroup,
    NewReservedName, NewService, NewSubmission, NewSubmissionAnswer, ReservedName, Service,
};
use crate::db::{Id, MemoryStore};
use crate::hydration::HydratedSubmission;

/// Empty store.
#[fixture]
pub fn store() -> MemoryStore {
    MemoryStore::new()
}

/// Store populated with a company name clearance service.
///
/// The "Name Clearance" form asks for three proposed names (checked against the reserved-name
/// registry) in its "Proposed Names" section, followed by a country dropdown in the "Location"
/// section. Provinces depend on the selected country.
pub struct NameClearance {
    pub store: MemoryStore,
    pub company: Group,
    pub proposed_name: Field,
    pub country: Field,
    pub country_list: Collection,
    pub zambia: CollectionItem,
    pub malawi: CollectionItem,
    pub province: Collection,
    pub zambian_provinces: Vec<CollectionItem>,
    pub service: Service,
    pub form: Form,

    /// "Proposed Name 1" to "Proposed Name 3", followed by the unnamed country field.
    pub form_fields: Vec<FormField>,
}

fn data_type_id(store: &MemoryStore, kind: DataKind) -> Id {
    store
        .get_all::<DataType>()
        .into_iter()
        .find(|data_type| data_type.kind() == Some(kind))
        .map(|data_type| data_type.id)
        .expect("Data types are seeded")
}

fn collection_item(
    store: &MemoryStore,
    collection: &Collection,
    name: &str,
    parent: Option<&CollectionItem>,
) -> CollectionItem {
    store
        .create::<CollectionItem>(NewCollectionItem {
            collection_id: collection.id,
            collection_item: name.into(),
            relation_collection_items_id: parent.map(|item| item.id),
        })
        .unwrap()
}

#[fixture]
pub fn name_clearance() -> NameClearance {
    let store = MemoryStore::new();
    store.seed_data_types().unwrap();

    let company = store
        .create::<Group>(NewGroup {
            group_name: "Company".into(),
        })
        .unwrap();

    let country_list = store
        .create::<Collection>(NewCollection {
            collection_name: "Country".into(),
        })
        .unwrap();
    let zambia = collection_item(&store, &country_list, "Zambia", None);
    let malawi = collection_item(&store, &country_list, "Malawi", None);

    let province = store
        .create::<Collection>(NewCollection {
            collection_name: "Province".into(),
        })
        .unwrap();
    let zambian_provinces = vec![
        collection_item(&store, &province, "Lusaka", Some(&zambia)),
        collection_item(&store, &province, "Copperbelt", Some(&zambia)),
    ];
    collection_item(&store, &province, "Southern Region", Some(&malawi));

    let proposed_name = store
        .create::<Field>(NewField {
            label: "Proposed Name".into(),
            data_type_id: data_type_id(&store, DataKind::Text),
            group_id: Some(company.id),
            status: "active".into(),
            collection_id: None,
        })
        .unwrap();
    let country = store
        .create::<Field>(NewField {
            label: "Country".into(),
            data_type_id: data_type_id(&store, DataKind::Dropdown),
            group_id: Some(company.id),
            status: "active".into(),
            collection_id: Some(country_list.id),
        })
        .unwrap();

    let service = store
        .create::<Service>(NewService {
            service_name: "Name Clearance".into(),
        })
        .unwrap();
    let form = store
        .create::<Form>(NewForm {
            form_name: "Name Clearance".into(),
            description: "Reserve a name for a new company".into(),
            service_id: service.id,
            status: "active".into(),
        })
        .unwrap();

    let proposed_names = store
        .create::<FormGroup>(NewFormGroup {
            group_name: "Proposed Names".into(),
            group_span: 12,
            group_row: 1,
        })
        .unwrap();
    let location = store
        .create::<FormGroup>(NewFormGroup {
            group_name: "Location".into(),
            group_span: 12,
            group_row: 2,
        })
        .unwrap();

    let mut form_fields: Vec<FormField> = (1..=3)
        .map(|number| {
            store
                .create::<FormField>(NewFormField {
                    form_id: form.id,
                    field_id: proposed_name.id,
                    field_name: format!("Proposed Name {}", number),
                    validation: "validate_reserved_name".into(),
                    field_span: 12,
                    field_row: number,
                    form_group_id: Some(proposed_names.id),
                })
                .unwrap()
        })
        .collect();
    form_fields.push(
        store
            .create::<FormField>(NewFormField {
                form_id: form.id,
                field_id: country.id,
                field_name: String::new(),
                validation: ",1".into(),
                field_span: 6,
                field_row: 1,
                form_group_id: Some(location.id),
            })
            .unwrap(),
    );

    for name in ["PACRA", "Bank of Zambia"] {
        store
            .create::<ReservedName>(NewReservedName {
                reserved_name: name.into(),
            })
            .unwrap();
    }

    NameClearance {
        store,
        company,
        proposed_name,
        country,
        country_list,
        zambia,
        malawi,
        province,
        zambian_provinces,
        service,
        form,
        form_fields,
    }
}

/// Submits answers for the given form fields on behalf of user 1.
pub fn submit(store: &MemoryStore, answers: &[(Id, &str)]) -> HydratedSubmission {
    let services_id = store
        .get_all::<Service>()
        .first()
        .map_or(1, |service| service.id);

    store
        .create_submission(NewSubmission {
            services_id,
            created_by: 1,
            form_answers: answers
                .iter()
                .map(|(form_field_id, answer)| NewSubmissionAnswer {
                    form_field_id: *form_field_id,
                    answer: answer.to_string(),
                })
                .collect(),
        })
        .unwrap()
}
