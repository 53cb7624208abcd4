use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use adpilot_core::domain::campaign::SessionId;
use adpilot_core::domain::session::ConversationState;

/// Session key used by callers that do not manage their own sessions.
pub const DEFAULT_SESSION: &str = "conv_001";

/// Owns one `ConversationState` per session key. Sessions are created empty
/// on first touch; state never leaks between keys, and all access runs under
/// the store lock so a session advances one operation at a time.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, ConversationState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session<T>(
        &self,
        session_id: &str,
        action: impl FnOnce(&mut ConversationState) -> T,
    ) -> T {
        let mut sessions = match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        };
        let state = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationState::new(SessionId(session_id.to_string())));
        action(state)
    }

    pub fn session_count(&self) -> usize {
        match self.sessions.lock() {
            Ok(sessions) => sessions.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use adpilot_core::fields::FieldName;

    use super::SessionStore;

    #[test]
    fn sessions_are_created_empty_on_first_touch() {
        let store = SessionStore::new();
        let name = store.with_session("conv_a", |state| state.campaign_name().map(str::to_string));
        assert_eq!(name, None);
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn sessions_are_isolated_by_key() {
        let store = SessionStore::new();
        store.with_session("conv_a", |state| {
            state.assign(FieldName::CampaignName, "Summer Launch").expect("valid name")
        });

        let other = store.with_session("conv_b", |state| state.campaign_name().map(str::to_string));
        assert_eq!(other, None, "conv_b must not see conv_a's fields");

        let original =
            store.with_session("conv_a", |state| state.campaign_name().map(str::to_string));
        assert_eq!(original.as_deref(), Some("Summer Launch"));
    }
}
