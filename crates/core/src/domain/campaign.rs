use serde::{Deserialize, Serialize};

use crate::outcome::{FailureKind, ValidationFailure};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Campaign objective. Parsing is case-sensitive: the platform contract
/// spells the variants `Traffic` and `Conversions` exactly, and the payload
/// serializes them the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    Traffic,
    Conversions,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "Traffic",
            Self::Conversions => "Conversions",
        }
    }
}

impl std::str::FromStr for Objective {
    type Err = ValidationFailure;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Traffic" => Ok(Self::Traffic),
            "Conversions" => Ok(Self::Conversions),
            _ => Err(ValidationFailure::new(
                FailureKind::InvalidEnum,
                "Objective must be 'Traffic' or 'Conversions'.",
                "Reply with exactly Traffic or Conversions.",
                true,
            )),
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Music choice. Unlike `Objective`, parsing is case-insensitive and the
/// stored form is the lowercase token. The asymmetry mirrors the platform
/// contract and is intentional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicChoice {
    Existing,
    Upload,
    None,
}

impl MusicChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Upload => "upload",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for MusicChoice {
    type Err = ValidationFailure;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "existing" => Ok(Self::Existing),
            "upload" => Ok(Self::Upload),
            "none" => Ok(Self::None),
            _ => Err(ValidationFailure::new(
                FailureKind::InvalidEnum,
                "Invalid music choice.",
                "Choose existing, upload, or none.",
                true,
            )),
        }
    }
}

impl std::fmt::Display for MusicChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved music selection, ready to commit. Track-backed variants
/// carry their id, so a committed selection can never leave the state with a
/// dangling or missing `music_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MusicSelection {
    Existing { music_id: String },
    Upload { music_id: String },
    None,
}

impl MusicSelection {
    pub fn choice(&self) -> MusicChoice {
        match self {
            Self::Existing { .. } => MusicChoice::Existing,
            Self::Upload { .. } => MusicChoice::Upload,
            Self::None => MusicChoice::None,
        }
    }

    pub fn music_id(&self) -> Option<&str> {
        match self {
            Self::Existing { music_id } | Self::Upload { music_id } => Some(music_id),
            Self::None => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creative {
    pub text: String,
    pub cta: String,
    pub music_id: Option<String>,
}

/// Serialization contract handed to the submission service. Field names and
/// nesting are fixed by the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdPayload {
    pub campaign_name: String,
    pub objective: Objective,
    pub creative: Creative,
}

#[cfg(test)]
mod tests {
    use super::{AdPayload, Creative, MusicChoice, MusicSelection, Objective};

    #[test]
    fn objective_parse_is_case_sensitive() {
        assert_eq!("Traffic".parse::<Objective>().expect("exact spelling"), Objective::Traffic);
        assert!("traffic".parse::<Objective>().is_err());
        assert!("CONVERSIONS".parse::<Objective>().is_err());
    }

    #[test]
    fn music_choice_parse_is_case_insensitive() {
        assert_eq!("Existing".parse::<MusicChoice>().expect("mixed case"), MusicChoice::Existing);
        assert_eq!("  UPLOAD ".parse::<MusicChoice>().expect("padded"), MusicChoice::Upload);
        assert_eq!("none".parse::<MusicChoice>().expect("lowercase"), MusicChoice::None);
        assert!("silence".parse::<MusicChoice>().is_err());
    }

    #[test]
    fn selection_exposes_choice_and_id() {
        let selection = MusicSelection::Existing { music_id: "music_abc123".to_string() };
        assert_eq!(selection.choice(), MusicChoice::Existing);
        assert_eq!(selection.music_id(), Some("music_abc123"));
        assert_eq!(MusicSelection::None.music_id(), None);
    }

    #[test]
    fn payload_serializes_with_fixed_nesting() {
        let payload = AdPayload {
            campaign_name: "Summer Launch".to_string(),
            objective: Objective::Conversions,
            creative: Creative {
                text: "Fresh drops every Friday".to_string(),
                cta: "Shop Now".to_string(),
                music_id: Some("music_9f3a11".to_string()),
            },
        };

        let json = serde_json::to_value(&payload).expect("payload should serialize");
        assert_eq!(json["campaign_name"], "Summer Launch");
        assert_eq!(json["objective"], "Conversions");
        assert_eq!(json["creative"]["text"], "Fresh drops every Friday");
        assert_eq!(json["creative"]["cta"], "Shop Now");
        assert_eq!(json["creative"]["music_id"], "music_9f3a11");
    }

    #[test]
    fn music_free_payload_serializes_null_music_id() {
        let payload = AdPayload {
            campaign_name: "Awareness Push".to_string(),
            objective: Objective::Traffic,
            creative: Creative {
                text: "See what everyone is talking about".to_string(),
                cta: "Learn More".to_string(),
                music_id: None,
            },
        };

        let json = serde_json::to_value(&payload).expect("payload should serialize");
        assert!(json["creative"]["music_id"].is_null());
    }
}
