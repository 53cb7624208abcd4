use serde::{Deserialize, Serialize};

use adpilot_core::outcome::{FailureKind, ValidationFailure};

/// The only credential the mocked platform accepts.
pub const MOCK_ACCESS_TOKEN: &str = "mock_access_token";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub scopes: Vec<String>,
}

/// Simulated authorization-code exchange. Failures come back as the same
/// result shape used everywhere else rather than being raised, so transport
/// code handles them exactly like validation rejections.
pub fn exchange_code_for_token(code: &str) -> Result<TokenGrant, ValidationFailure> {
    match code {
        "bad_client" => Err(ValidationFailure::new(
            FailureKind::InvalidClientCredentials,
            "Client ID or secret is incorrect.",
            "Verify the ad platform app credentials.",
            false,
        )),
        "no_scope" => Err(ValidationFailure::new(
            FailureKind::MissingPermission,
            "Ads permission scope not granted.",
            "Reauthorize with ads.read and ads.write scopes.",
            false,
        )),
        "expired_code" => Err(ValidationFailure::new(
            FailureKind::AuthorizationCodeExpired,
            "The authorization code is no longer valid.",
            "Restart the OAuth login flow.",
            true,
        )),
        _ => Ok(TokenGrant {
            access_token: MOCK_ACCESS_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            scopes: vec!["ads.read".to_string(), "ads.write".to_string()],
        }),
    }
}
