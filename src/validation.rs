// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interpretation of the free-text validation tags of form fields.
//!
//! Tags are stored verbatim on every `FormField`. Known tags map to a `Validation` variant and
//! the `ValidatorRegistry` looks up the validator for a variant. Running validators only reports
//! issues, nothing here blocks a submission from being stored.
use std::collections::HashMap;
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::db::models::{FormAnswer, ReservedName};
use crate::db::{Id, Tables};
use crate::hydration::HydratedSubmission;
use crate::reserved;

/// Tag asking for the answer to be checked against the reserved-name registry.
pub const RESERVED_NAME_TAG: &str = "validate_reserved_name";

/// Parsed validation tag of a form field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Validation {
    /// No tag set.
    None,

    /// Legacy layout marker of the form `",N"`. It does not gate anything.
    GroupMarker(u32),

    /// Answer must not collide with a reserved name.
    ReservedNameCheck,

    /// Any other tag, kept as is.
    Unknown(String),
}

impl Validation {
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();

        if tag.is_empty() {
            return Validation::None;
        }

        if tag == RESERVED_NAME_TAG {
            return Validation::ReservedNameCheck;
        }

        match tag.strip_prefix(',').map(str::parse::<u32>) {
            Some(Ok(marker)) => Validation::GroupMarker(marker),
            _ => Validation::Unknown(tag.to_owned()),
        }
    }

    pub fn kind(&self) -> ValidationKind {
        match self {
            Validation::None => ValidationKind::None,
            Validation::GroupMarker(_) => ValidationKind::GroupMarker,
            Validation::ReservedNameCheck => ValidationKind::ReservedNameCheck,
            Validation::Unknown(_) => ValidationKind::Unknown,
        }
    }
}

impl From<&str> for Validation {
    fn from(tag: &str) -> Self {
        Validation::parse(tag)
    }
}

/// Variant of a `Validation` without its payload, used as registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    None,
    GroupMarker,
    ReservedNameCheck,
    Unknown,
}

/// Problem a validator found with one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub form_answer_id: Id,
    pub form_field_id: Id,
    pub message: String,

    /// Reserved names the answer collides with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ReservedName>,
}

/// Checks one answer, returns an issue when the answer is not acceptable.
pub type Validator = fn(&Tables, &FormAnswer) -> Option<ValidationIssue>;

/// Flags answers colliding with the reserved-name registry.
pub fn reserved_name_validator(tables: &Tables, answer: &FormAnswer) -> Option<ValidationIssue> {
    let conflicts = reserved::check(tables.reserved_names.iter(), &answer.answer);

    if conflicts.is_empty() {
        return None;
    }

    Some(ValidationIssue {
        form_answer_id: answer.id,
        form_field_id: answer.form_field_id,
        message: format!(
            "'{}' collides with {} reserved name(s)",
            answer.answer,
            conflicts.len()
        ),
        conflicts,
    })
}

/// Lookup table from validation kind to validator function.
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<ValidationKind, Validator>,
}

impl ValidatorRegistry {
    /// Returns a registry without any validators.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Registers a validator, replacing an earlier one of the same kind.
    pub fn register(&mut self, kind: ValidationKind, validator: Validator) {
        self.validators.insert(kind, validator);
    }

    pub fn get(&self, kind: ValidationKind) -> Option<Validator> {
        self.validators.get(&kind).copied()
    }

    /// Runs the validators of every answered form field of a hydrated submission.
    ///
    /// Answers pointing at form fields which are not part of the submission's field set are
    /// skipped.
    pub fn validate(
        &self,
        tables: &Tables,
        submission: &HydratedSubmission,
    ) -> Vec<ValidationIssue> {
        submission
            .form_answers
            .iter()
            .filter_map(|answer| {
                let form_field = submission
                    .form_fields
                    .iter()
                    .find(|form_field| form_field.id == answer.form_field_id)?;
                let validator = self.get(Validation::parse(&form_field.validation).kind())?;
                validator(tables, answer)
            })
            .collect()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ValidationKind::ReservedNameCheck, reserved_name_validator);
        registry
    }
}

impl Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("kinds", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
