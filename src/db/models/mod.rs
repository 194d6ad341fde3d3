// SPDX-License-Identifier: AGPL-3.0-or-later

//! Rows of the store's tables together with their create and partial update payloads.
mod collection;
mod data_type;
mod field;
mod form;
mod group;
mod reserved_name;
mod service;
mod submission;
mod user;

use serde::{Deserialize, Deserializer};

pub use collection::{
    Collection, CollectionItem, CollectionItemPatch, CollectionPatch, NewCollection,
    NewCollectionItem,
};
pub use data_type::{DataKind, DataType, DataTypePatch, NewDataType};
pub use field::{Field, FieldPatch, NewField};
pub use form::{
    Form, FormField, FormFieldPatch, FormGroup, FormGroupPatch, FormPatch, NewForm, NewFormField,
    NewFormGroup,
};
pub use group::{Group, GroupPatch, NewGroup};
pub use reserved_name::{NewReservedName, ReservedName, ReservedNamePatch};
pub use service::{NewService, Service, ServicePatch};
pub use submission::{
    case_number, FormAnswer, FormAnswerPatch, NewFormAnswer, NewSubmission, NewSubmissionAnswer,
    Submission, SubmissionDraft, SubmissionPatch, SubmissionUpdate,
};
pub use user::{NewUser, User, UserPatch};

/// Deserializes a nullable field of a partial update.
///
/// Used together with `#[serde(default)]` to tell apart a missing key (`None`, leave unchanged)
/// from an explicit `null` (`Some(None)`, clear the value).
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
