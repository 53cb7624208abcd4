use async_trait::async_trait;
use uuid::Uuid;

use adpilot_core::outcome::{FailureKind, ValidationFailure, ValidationOutcome};

#[async_trait]
pub trait MusicService: Send + Sync {
    /// Checks whether an existing track id is usable for this campaign.
    async fn lookup(&self, music_id: &str) -> ValidationOutcome;
    /// Registers a fresh upload and returns its generated id. Uploads are
    /// assumed always to succeed.
    async fn upload(&self) -> String;
}

/// Deterministic stand-in for the platform's music catalog. Lookup outcomes
/// are keyed off the id prefix: `bad*` ids are unknown or unauthorized,
/// `geo*` ids exist but are region-locked, everything else resolves.
#[derive(Clone, Debug, Default)]
pub struct MockMusicLibrary;

#[async_trait]
impl MusicService for MockMusicLibrary {
    async fn lookup(&self, music_id: &str) -> ValidationOutcome {
        if music_id.trim().is_empty() {
            return Err(ValidationFailure::new(
                FailureKind::MissingMusicId,
                "No music ID was provided.",
                "Provide a music ID or choose another music option.",
                false,
            ));
        }

        if music_id.starts_with("bad") {
            return Err(ValidationFailure::new(
                FailureKind::InvalidMusicId,
                "Music ID not found or unauthorized.",
                "Provide a valid music ID or upload custom music.",
                true,
            ));
        }

        if music_id.starts_with("geo") {
            return Err(ValidationFailure::new(
                FailureKind::GeoRestrictedMusic,
                "Music is not available in the selected region.",
                "Select different music or remove music.",
                true,
            ));
        }

        Ok(())
    }

    async fn upload(&self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("music_{}", &hex[..8])
    }
}
