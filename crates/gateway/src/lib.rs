//! Mocked external collaborators for the ad platform.
//!
//! The dialogue core never talks to the real platform: every outbound call
//! goes through the service traits here, and the deterministic mock
//! implementations reproduce the platform's documented failure modes
//! (invalid music ids, geo restrictions, expired tokens, missing scopes) so
//! the whole submission path can be exercised offline.

pub mod music;
pub mod oauth;
pub mod submission;

pub use music::{MockMusicLibrary, MusicService};
pub use oauth::{exchange_code_for_token, TokenGrant, MOCK_ACCESS_TOKEN};
pub use submission::{MockAdPlatform, SubmissionReceipt, SubmissionService};
