pub mod audit;
pub mod config;
pub mod domain;
pub mod fields;
pub mod gate;
pub mod outcome;
pub mod rules;
pub mod selector;

pub use domain::campaign::{
    AdPayload, Creative, MusicChoice, MusicSelection, Objective, SessionId,
};
pub use domain::session::{ConversationState, StateSnapshot};
pub use fields::{FieldName, FieldSpec};
pub use gate::{FieldViolation, SubmissionBlocked};
pub use outcome::{FailureKind, ValidationFailure, ValidationOutcome};
