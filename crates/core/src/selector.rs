use crate::domain::session::ConversationState;
use crate::fields::{self, FieldSpec, PROMPT_ORDER};

pub const COMPLETION_MESSAGE: &str = "All inputs collected. Ready to submit.";
pub const COMPLETION_RATIONALE: &str = "All required fields and business rules are satisfied.";

/// Picks the next field to request, walking the fixed prompt order. Returns
/// `None` once every mandatory field is present; `music_id` is never
/// selected here because its necessity is conditional on the music choice.
pub fn next_field(state: &ConversationState) -> Option<&'static FieldSpec> {
    PROMPT_ORDER
        .iter()
        .find(|field| !state.has_field(**field))
        .map(|field| fields::spec(*field))
}
