// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Id, Patch, Record, Table, TableName, Tables};

/// Builds the human-readable case number of a submission: `E-<YYYYMMDD>-<id, six digits>`.
pub fn case_number(created_on: &DateTime<Utc>, id: Id) -> String {
    format!("E-{}-{:06}", created_on.format("%Y%m%d"), id)
}

/// Stored part of a submission.
///
/// There is no link to the form the submission answers, it gets derived from the answers when
/// reading, see `HydratedSubmission`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Id,
    pub services_id: Id,
    pub case_number: String,
    pub created_by: Id,
    pub created_on: DateTime<Utc>,
}

/// Create payload of the `submissions` table, the case number is derived from the assigned id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub services_id: Id,
    pub created_by: Id,
    pub created_on: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubmissionPatch {
    pub services_id: Option<Id>,
    pub case_number: Option<String>,
    pub created_by: Option<Id>,
    pub created_on: Option<DateTime<Utc>>,
}

impl Patch<Submission> for SubmissionPatch {
    fn apply(self, record: &mut Submission) {
        if let Some(services_id) = self.services_id {
            record.services_id = services_id;
        }
        if let Some(case_number) = self.case_number {
            record.case_number = case_number;
        }
        if let Some(created_by) = self.created_by {
            record.created_by = created_by;
        }
        if let Some(created_on) = self.created_on {
            record.created_on = created_on;
        }
    }
}

impl Record for Submission {
    const TABLE: TableName = TableName::Submissions;
    type New = SubmissionDraft;
    type Patch = SubmissionPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: SubmissionDraft) -> Self {
        Self {
            id,
            services_id: new.services_id,
            case_number: case_number(&new.created_on, id),
            created_by: new.created_by,
            created_on: new.created_on,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.submissions
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.submissions
    }
}

/// Answer nested in a submission create or update payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmissionAnswer {
    pub form_field_id: Id,
    pub answer: String,
}

/// Payload for creating a submission together with its answers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewSubmission {
    pub services_id: Id,
    pub created_by: Id,
    #[serde(default, rename = "formAnswers", alias = "form_answers")]
    pub form_answers: Vec<NewSubmissionAnswer>,
}

/// Partial update of a submission.
///
/// When `form_answers` is present it replaces the complete answer set of the submission.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubmissionUpdate {
    #[serde(flatten)]
    pub patch: SubmissionPatch,
    #[serde(default, rename = "formAnswers", alias = "form_answers")]
    pub form_answers: Option<Vec<NewSubmissionAnswer>>,
}

/// One answer value, tied to the submission and to the form field instance it answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAnswer {
    pub id: Id,
    pub form_field_id: Id,
    pub answer: String,
    pub submission_id: Id,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewFormAnswer {
    pub form_field_id: Id,
    pub answer: String,
    pub submission_id: Id,
}

impl NewFormAnswer {
    /// Stamps a nested answer with the id of the submission it belongs to.
    pub fn for_submission(submission_id: Id, answer: NewSubmissionAnswer) -> Self {
        Self {
            form_field_id: answer.form_field_id,
            answer: answer.answer,
            submission_id,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormAnswerPatch {
    pub form_field_id: Option<Id>,
    pub answer: Option<String>,
    pub submission_id: Option<Id>,
}

impl Patch<FormAnswer> for FormAnswerPatch {
    fn apply(self, record: &mut FormAnswer) {
        if let Some(form_field_id) = self.form_field_id {
            record.form_field_id = form_field_id;
        }
        if let Some(answer) = self.answer {
            record.answer = answer;
        }
        if let Some(submission_id) = self.submission_id {
            record.submission_id = submission_id;
        }
    }
}

impl Record for FormAnswer {
    const TABLE: TableName = TableName::FormAnswers;
    type New = NewFormAnswer;
    type Patch = FormAnswerPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_new(id: Id, new: NewFormAnswer) -> Self {
        Self {
            id,
            form_field_id: new.form_field_id,
            answer: new.answer,
            submission_id: new.submission_id,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.form_answers
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.form_answers
    }
}
