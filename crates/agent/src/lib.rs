//! Agent runtime - deterministic slot-filling orchestration
//!
//! This crate wires the dialogue core to the platform collaborators:
//! - **Session store** (`sessions`) - one owned `ConversationState` per
//!   session key, never shared across sessions
//! - **Chat handling** (`runtime`) - select the expected field, validate the
//!   raw input, assign, and report the next prompt
//! - **Music sub-flow** (`runtime`) - resolve existing/upload/none choices
//!   against the music collaborator before anything is committed
//! - **Submission** (`runtime`) - run the gate, package the payload, and
//!   drive the submission collaborator
//!
//! # Design Principle
//!
//! The agent is a rule table, not a model. Which field is requested next,
//! what counts as valid, and when the state may be submitted are all
//! deterministic decisions made by the core; nothing here guesses.

pub mod runtime;
pub mod sessions;

pub use runtime::{AgentRuntime, ChatReply, MusicReply, SubmitRejection};
pub use sessions::{SessionStore, DEFAULT_SESSION};
