use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    TooShort,
    TooLong,
    Empty,
    InvalidEnum,
    MissingMusicId,
    MusicRequired,
    InvalidMusicId,
    GeoRestrictedMusic,
    OAuthTokenExpired,
    MissingPermission,
    InvalidClientCredentials,
    AuthorizationCodeExpired,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TooShort => "Value too short",
            Self::TooLong => "Value too long",
            Self::Empty => "Missing value",
            Self::InvalidEnum => "Invalid choice",
            Self::MissingMusicId => "Missing music ID",
            Self::MusicRequired => "Music required",
            Self::InvalidMusicId => "Invalid music ID",
            Self::GeoRestrictedMusic => "Geo-restricted music",
            Self::OAuthTokenExpired => "OAuth token expired",
            Self::MissingPermission => "Missing permission",
            Self::InvalidClientCredentials => "Invalid client credentials",
            Self::AuthorizationCodeExpired => "Authorization code expired",
        }
    }
}

/// Uniform failure shape shared by field validators, cross-field rules, and
/// the mocked platform collaborators. Every failure is recoverable by
/// corrected input; `retry_allowed` tells the caller whether retrying the
/// same operation can ever succeed.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}: {explanation}", .kind.label())]
pub struct ValidationFailure {
    #[serde(rename = "error")]
    pub kind: FailureKind,
    pub explanation: String,
    pub suggested_action: String,
    pub retry_allowed: bool,
}

impl ValidationFailure {
    pub fn new(
        kind: FailureKind,
        explanation: impl Into<String>,
        suggested_action: impl Into<String>,
        retry_allowed: bool,
    ) -> Self {
        Self {
            kind,
            explanation: explanation.into(),
            suggested_action: suggested_action.into(),
            retry_allowed,
        }
    }
}

pub type ValidationOutcome = Result<(), ValidationFailure>;
