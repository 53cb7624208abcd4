use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use adpilot_core::domain::campaign::AdPayload;
use adpilot_core::outcome::{FailureKind, ValidationFailure};

use crate::oauth::MOCK_ACCESS_TOKEN;

/// Successful submission response: the platform-assigned ad id plus the
/// payload echoed back exactly as it was accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub status: String,
    pub ad_id: String,
    pub submitted_payload: AdPayload,
}

#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(
        &self,
        payload: &AdPayload,
        credential: &SecretString,
    ) -> Result<SubmissionReceipt, ValidationFailure>;
}

/// Deterministic stand-in for the ad platform's submission endpoint. Failure
/// modes are triggered by payload content: the reserved campaign name
/// `no_permission` simulates a scope gap, `bad*` music ids fail platform-side
/// music validation, and any credential other than the expected token reads
/// as expired.
#[derive(Clone, Debug)]
pub struct MockAdPlatform {
    expected_token: String,
}

impl MockAdPlatform {
    pub fn new(expected_token: impl Into<String>) -> Self {
        Self { expected_token: expected_token.into() }
    }
}

impl Default for MockAdPlatform {
    fn default() -> Self {
        Self::new(MOCK_ACCESS_TOKEN)
    }
}

#[async_trait]
impl SubmissionService for MockAdPlatform {
    async fn submit(
        &self,
        payload: &AdPayload,
        credential: &SecretString,
    ) -> Result<SubmissionReceipt, ValidationFailure> {
        if credential.expose_secret() != self.expected_token {
            return Err(ValidationFailure::new(
                FailureKind::OAuthTokenExpired,
                "Access token is invalid, expired, or revoked.",
                "Re-authenticate using OAuth.",
                true,
            ));
        }

        if payload.campaign_name == "no_permission" {
            return Err(ValidationFailure::new(
                FailureKind::MissingPermission,
                "OAuth token does not have ads.write permission.",
                "Reauthorize with ads.write scope.",
                false,
            ));
        }

        if payload
            .creative
            .music_id
            .as_deref()
            .is_some_and(|music_id| music_id.starts_with("bad"))
        {
            return Err(ValidationFailure::new(
                FailureKind::InvalidMusicId,
                "Music validation failed during submission.",
                "Select or upload a different music track.",
                true,
            ));
        }

        let hex = Uuid::new_v4().simple().to_string();
        Ok(SubmissionReceipt {
            status: "success".to_string(),
            ad_id: format!("ad_{}", &hex[..6]),
            submitted_payload: payload.clone(),
        })
    }
}
