use serde::Serialize;
use thiserror::Error;

use crate::domain::campaign::{AdPayload, MusicChoice};
use crate::domain::session::ConversationState;
use crate::fields::{self, FieldName};
use crate::outcome::{FailureKind, ValidationFailure};
use crate::rules;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: FieldName,
    #[serde(flatten)]
    pub failure: ValidationFailure,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmissionBlocked {
    #[error("submission blocked: {} required field(s) missing or invalid", .violations.len())]
    MissingFields { violations: Vec<FieldViolation> },
    #[error(transparent)]
    RuleViolation(ValidationFailure),
}

impl SubmissionBlocked {
    pub fn violated_fields(&self) -> Vec<FieldName> {
        match self {
            Self::MissingFields { violations } => {
                violations.iter().map(|violation| violation.field).collect()
            }
            Self::RuleViolation(_) => Vec::new(),
        }
    }
}

/// Final aggregate check before handing the state to the submission
/// collaborator. Field checks collect every violation in one pass instead of
/// stopping at the first; the cross-field rule is only reported once the
/// fields are individually fine. Never mutates the state, so re-evaluating
/// an unchanged session yields an identical outcome.
pub fn evaluate(state: &ConversationState) -> Result<AdPayload, SubmissionBlocked> {
    let violations = field_violations(state);
    if !violations.is_empty() {
        return Err(SubmissionBlocked::MissingFields { violations });
    }

    rules::check_cross_field_rules(state).map_err(SubmissionBlocked::RuleViolation)?;

    state
        .payload()
        .ok_or_else(|| SubmissionBlocked::MissingFields { violations: field_violations(state) })
}

/// Every mandatory-field violation in the live state: absent fields, stored
/// values that fail their own validator, and a missing `music_id` for
/// track-backed music choices.
pub fn field_violations(state: &ConversationState) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    check_string_field(&mut violations, FieldName::CampaignName, state.campaign_name());
    if state.objective().is_none() {
        violations.push(missing(FieldName::Objective));
    }
    check_string_field(&mut violations, FieldName::Text, state.text());
    check_string_field(&mut violations, FieldName::Cta, state.cta());
    if state.music_choice().is_none() {
        violations.push(missing(FieldName::MusicChoice));
    }

    if matches!(state.music_choice(), Some(MusicChoice::Existing) | Some(MusicChoice::Upload)) {
        if let Err(failure) = fields::validate(FieldName::MusicId, state.music_id().unwrap_or("")) {
            violations.push(FieldViolation { field: FieldName::MusicId, failure });
        }
    }

    violations
}

fn check_string_field(
    violations: &mut Vec<FieldViolation>,
    field: FieldName,
    value: Option<&str>,
) {
    match value {
        None => violations.push(missing(field)),
        Some(stored) => {
            if let Err(failure) = fields::validate(field, stored) {
                violations.push(FieldViolation { field, failure });
            }
        }
    }
}

fn missing(field: FieldName) -> FieldViolation {
    FieldViolation {
        field,
        failure: ValidationFailure::new(
            FailureKind::Empty,
            format!("{field} has not been provided."),
            fields::spec(field).prompt,
            true,
        ),
    }
}
