use serde::{Deserialize, Serialize};

use crate::domain::campaign::{MusicChoice, Objective};
use crate::outcome::{FailureKind, ValidationFailure, ValidationOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    CampaignName,
    Objective,
    Text,
    Cta,
    MusicChoice,
    MusicId,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignName => "campaign_name",
            Self::Objective => "objective",
            Self::Text => "text",
            Self::Cta => "cta",
            Self::MusicChoice => "music_choice",
            Self::MusicId => "music_id",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the field table: the validator for a field plus the stable
/// prompt and rationale the selector surfaces when asking for it.
pub struct FieldSpec {
    pub field: FieldName,
    pub prompt: &'static str,
    pub rationale: &'static str,
    validate: fn(&str) -> ValidationOutcome,
}

/// The fixed order in which missing fields are requested. `music_id` is not
/// part of this sequence: its necessity depends on the music choice and is
/// enforced inside the music selection sub-flow.
pub const PROMPT_ORDER: [FieldName; 5] = [
    FieldName::CampaignName,
    FieldName::Objective,
    FieldName::Text,
    FieldName::Cta,
    FieldName::MusicChoice,
];

// Indexed by FieldName discriminant; alignment is asserted in tests.
static FIELD_TABLE: [FieldSpec; 6] = [
    FieldSpec {
        field: FieldName::CampaignName,
        prompt: "What is your campaign name?",
        rationale: "Campaign name is required and must be at least 3 characters.",
        validate: validate_campaign_name,
    },
    FieldSpec {
        field: FieldName::Objective,
        prompt: "What is your campaign objective? (Traffic or Conversions)",
        rationale: "Objective determines music requirements and submission rules.",
        validate: validate_objective,
    },
    FieldSpec {
        field: FieldName::Text,
        prompt: "Enter ad text (max 100 characters)",
        rationale: "Ad text is mandatory and limited by platform policy.",
        validate: validate_text,
    },
    FieldSpec {
        field: FieldName::Cta,
        prompt: "Enter CTA (e.g., Shop Now, Learn More)",
        rationale: "CTA is required to drive user action.",
        validate: validate_cta,
    },
    FieldSpec {
        field: FieldName::MusicChoice,
        prompt: "Choose music option (existing / upload / none)",
        rationale: "Music is optional for Traffic campaigns but mandatory for Conversion campaigns.",
        validate: validate_music_choice,
    },
    FieldSpec {
        field: FieldName::MusicId,
        prompt: "Provide the music ID for the selected track",
        rationale: "Existing and uploaded music selections must reference a music ID.",
        validate: validate_music_id,
    },
];

pub fn spec(field: FieldName) -> &'static FieldSpec {
    &FIELD_TABLE[field as usize]
}

/// Validate a candidate value for a field in isolation. Stateless,
/// deterministic, and total over any string input.
pub fn validate(field: FieldName, raw: &str) -> ValidationOutcome {
    (spec(field).validate)(raw)
}

fn validate_campaign_name(raw: &str) -> ValidationOutcome {
    if raw.trim().chars().count() < 3 {
        return Err(ValidationFailure::new(
            FailureKind::TooShort,
            "Campaign name must be at least 3 characters.",
            "Provide a campaign name with at least 3 characters.",
            true,
        ));
    }
    Ok(())
}

fn validate_objective(raw: &str) -> ValidationOutcome {
    raw.parse::<Objective>().map(|_| ())
}

fn validate_text(raw: &str) -> ValidationOutcome {
    if raw.chars().count() > 100 {
        return Err(ValidationFailure::new(
            FailureKind::TooLong,
            "Ad text exceeds 100 characters.",
            "Shorten the ad text to 100 characters or fewer.",
            true,
        ));
    }
    Ok(())
}

fn validate_cta(raw: &str) -> ValidationOutcome {
    if raw.trim().is_empty() {
        return Err(ValidationFailure::new(
            FailureKind::Empty,
            "CTA cannot be empty.",
            "Provide a call to action such as Shop Now or Learn More.",
            true,
        ));
    }
    Ok(())
}

fn validate_music_choice(raw: &str) -> ValidationOutcome {
    raw.parse::<MusicChoice>().map(|_| ())
}

fn validate_music_id(raw: &str) -> ValidationOutcome {
    if raw.trim().is_empty() {
        return Err(ValidationFailure::new(
            FailureKind::MissingMusicId,
            "No music ID was provided.",
            "Provide a music ID or choose another music option.",
            false,
        ));
    }
    Ok(())
}
