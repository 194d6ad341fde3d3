// SPDX-License-Identifier: AGPL-3.0-or-later

//! Read-time reconstruction of a submission's question and answer context.
//!
//! Submissions do not store the form they answer. The form gets derived from the chain
//! `FormAnswer -> FormField -> form_id` every time a submission is read, which keeps the link
//! intact when form fields are edited and reflects answers which were replaced later on.
use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::db::models::{FormAnswer, FormField, Submission};
use crate::db::{Id, Tables};

/// Submission together with its answers, the form fields they belong to and the derived form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedSubmission {
    #[serde(flatten)]
    pub submission: Submission,

    /// All answers stored for this submission, in insertion order.
    #[serde(rename = "formAnswers")]
    pub form_answers: Vec<FormAnswer>,

    /// Every form field of the derived form, or only the answered ones when the form could not
    /// be derived.
    #[serde(rename = "formFields")]
    pub form_fields: Vec<FormField>,

    /// Form the submission answers, absent when it could not be derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<Id>,
}

/// Returns all answers stored for a submission, in insertion order.
pub fn answers_for_submission(tables: &Tables, submission_id: Id) -> Vec<FormAnswer> {
    tables
        .form_answers
        .filter(|answer| answer.submission_id == submission_id)
}

/// Derives the form a set of answers belongs to from the form field behind the first answer.
///
/// Returns `None` when there are no answers or when that form field does not exist anymore.
pub fn derive_form_id(tables: &Tables, answers: &[FormAnswer]) -> Option<Id> {
    let first = answers.first()?;

    match tables.form_fields.get(first.form_field_id) {
        Some(form_field) => Some(form_field.form_id),
        None => {
            warn!(
                "Form field {} answered by form answer {} does not exist",
                first.form_field_id, first.id
            );
            None
        }
    }
}

/// Builds the full question and answer view of a submission.
///
/// When the form could be derived, all form fields of that form are included, also the ones
/// without an answer yet. Otherwise only the form fields referenced by the answers are included
/// (de-duplicated, in table order), which is empty when those do not exist anymore.
pub fn hydrate(tables: &Tables, submission: Submission) -> HydratedSubmission {
    let form_answers = answers_for_submission(tables, submission.id);
    let form_id = derive_form_id(tables, &form_answers);

    let form_fields = match form_id {
        Some(form_id) => tables
            .form_fields
            .filter(|form_field| form_field.form_id == form_id),
        None => {
            let answered: HashSet<Id> = form_answers
                .iter()
                .map(|answer| answer.form_field_id)
                .collect();

            if !answered.is_empty() {
                debug!(
                    "Could not derive form of submission {}, falling back to {} answered fields",
                    submission.id,
                    answered.len()
                );
            }

            tables
                .form_fields
                .filter(|form_field| answered.contains(&form_field.id))
        }
    };

    HydratedSubmission {
        submission,
        form_answers,
        form_fields,
        form_id,
    }
}
