// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::{DateTime, Utc};
use log::debug;

use crate::db::errors::StoreError;
use crate::db::models::{
    FormAnswer, NewFormAnswer, NewSubmission, NewSubmissionAnswer, Submission, SubmissionDraft,
    SubmissionUpdate,
};
use crate::db::{Id, MemoryStore, Record, Tables};
use crate::hydration::{answers_for_submission, hydrate, HydratedSubmission};
use crate::validation::{ValidationIssue, ValidatorRegistry};

/// Inserts the answers of a submission, in the given order.
fn insert_answers(
    tables: &mut Tables,
    submission_id: Id,
    answers: Vec<NewSubmissionAnswer>,
) -> Result<(), StoreError> {
    for answer in answers {
        tables.insert::<FormAnswer>(NewFormAnswer::for_submission(submission_id, answer))?;
    }
    Ok(())
}

impl MemoryStore {
    /// Creates a submission together with its answers and returns it hydrated.
    ///
    /// Either the submission and all answers get stored, or nothing does.
    pub fn create_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<HydratedSubmission, StoreError> {
        self.create_submission_at(submission, Utc::now())
    }

    /// Same as `create_submission` with a fixed creation timestamp.
    pub fn create_submission_at(
        &self,
        submission: NewSubmission,
        created_on: DateTime<Utc>,
    ) -> Result<HydratedSubmission, StoreError> {
        let hydrated = self.transaction(|tables| {
            let draft = SubmissionDraft {
                services_id: submission.services_id,
                created_by: submission.created_by,
                created_on,
            };
            let created = tables.insert::<Submission>(draft)?;
            insert_answers(tables, created.id, submission.form_answers)?;
            Ok(hydrate(tables, created))
        })?;

        debug!(
            "Created submission {} with {} answers",
            hydrated.submission.case_number,
            hydrated.form_answers.len()
        );

        Ok(hydrated)
    }

    /// Patches a submission. When answers are given they replace all stored answers of the
    /// submission.
    pub fn update_submission(
        &self,
        id: Id,
        update: SubmissionUpdate,
    ) -> Result<HydratedSubmission, StoreError> {
        self.transaction(|tables| {
            let updated = tables.update::<Submission>(id, update.patch)?;

            if let Some(answers) = update.form_answers {
                let removed = tables
                    .form_answers
                    .remove_where(|answer| answer.submission_id == id);
                debug!("Replacing {} answers of submission {}", removed, id);
                insert_answers(tables, id, answers)?;
            }

            Ok(hydrate(tables, updated))
        })
    }

    /// Returns a submission with its answers and the fields of the answered form.
    pub fn submission(&self, id: Id) -> Result<HydratedSubmission, StoreError> {
        self.read(|tables| {
            let submission = tables.get::<Submission>(id)?.clone();
            Ok(hydrate(tables, submission))
        })
    }

    /// Returns all submissions, hydrated.
    pub fn submissions(&self) -> Vec<HydratedSubmission> {
        self.read(|tables| {
            tables
                .submissions
                .iter()
                .map(|submission| hydrate(tables, submission.clone()))
                .collect()
        })
    }

    /// Returns all submissions made for a service, hydrated.
    pub fn submissions_by_service(&self, service_id: Id) -> Vec<HydratedSubmission> {
        self.read(|tables| {
            tables
                .submissions
                .iter()
                .filter(|submission| submission.services_id == service_id)
                .map(|submission| hydrate(tables, submission.clone()))
                .collect()
        })
    }

    /// Returns the stored answers of a submission.
    pub fn form_answers_by_submission(&self, submission_id: Id) -> Vec<FormAnswer> {
        self.read(|tables| answers_for_submission(tables, submission_id))
    }

    /// Deletes a submission and all of its answers.
    pub fn delete_submission(&self, id: Id) -> Result<(), StoreError> {
        let removed = self.transaction(|tables| {
            tables.delete::<Submission>(id)?;
            Ok(tables
                .form_answers
                .remove_where(|answer| answer.submission_id == id))
        })?;

        debug!(
            "Deleted record {} from {} together with {} answers",
            id,
            Submission::TABLE,
            removed
        );

        Ok(())
    }

    /// Runs all registered validators against the answers of a submission. Nothing gets
    /// modified.
    pub fn validate_submission(
        &self,
        id: Id,
        validators: &ValidatorRegistry,
    ) -> Result<Vec<ValidationIssue>, StoreError> {
        self.read(|tables| {
            let submission = tables.get::<Submission>(id)?.clone();
            let hydrated = hydrate(tables, submission);
            Ok(validators.validate(tables, &hydrated))
        })
    }
}
