use serde::Serialize;

use crate::domain::campaign::{
    AdPayload, Creative, MusicChoice, MusicSelection, Objective, SessionId,
};
use crate::fields::{self, FieldName};
use crate::outcome::{FailureKind, ValidationFailure, ValidationOutcome};

/// Collected field values for one conversation. Fields are private: every
/// mutation goes through the validated assignment path, so a stored value is
/// always individually valid and `music_id` is always consistent with
/// `music_choice`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationState {
    session_id: SessionId,
    campaign_name: Option<String>,
    objective: Option<Objective>,
    text: Option<String>,
    cta: Option<String>,
    music_choice: Option<MusicChoice>,
    music_id: Option<String>,
}

impl ConversationState {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            campaign_name: None,
            objective: None,
            text: None,
            cta: None,
            music_choice: None,
            music_id: None,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn campaign_name(&self) -> Option<&str> {
        self.campaign_name.as_deref()
    }

    pub fn objective(&self) -> Option<Objective> {
        self.objective
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn cta(&self) -> Option<&str> {
        self.cta.as_deref()
    }

    pub fn music_choice(&self) -> Option<MusicChoice> {
        self.music_choice
    }

    pub fn music_id(&self) -> Option<&str> {
        self.music_id.as_deref()
    }

    pub fn has_field(&self, field: FieldName) -> bool {
        match field {
            FieldName::CampaignName => self.campaign_name.is_some(),
            FieldName::Objective => self.objective.is_some(),
            FieldName::Text => self.text.is_some(),
            FieldName::Cta => self.cta.is_some(),
            FieldName::MusicChoice => self.music_choice.is_some(),
            FieldName::MusicId => self.music_id.is_some(),
        }
    }

    /// Validated assignment for the chat-collected fields. A rejected value
    /// leaves the state untouched so the caller can re-prompt.
    pub fn assign(&mut self, field: FieldName, raw: &str) -> ValidationOutcome {
        match field {
            FieldName::CampaignName => {
                fields::validate(field, raw)?;
                self.campaign_name = Some(raw.trim().to_string());
            }
            FieldName::Objective => {
                self.objective = Some(raw.parse()?);
            }
            FieldName::Text => {
                fields::validate(field, raw)?;
                self.text = Some(raw.trim().to_string());
            }
            FieldName::Cta => {
                fields::validate(field, raw)?;
                self.cta = Some(raw.trim().to_string());
            }
            FieldName::MusicChoice | FieldName::MusicId => {
                return Err(ValidationFailure::new(
                    FailureKind::InvalidEnum,
                    "Music fields are collected through the music selection step.",
                    "Use the music selection step with existing, upload, or none.",
                    true,
                ));
            }
        }
        Ok(())
    }

    /// Commit a resolved music selection. The selection type carries its own
    /// id, so a commit can never leave `music_choice` and `music_id` out of
    /// sync; `none` clears any previously selected track.
    pub fn commit_music(&mut self, selection: MusicSelection) {
        match selection {
            MusicSelection::Existing { music_id } => {
                self.music_choice = Some(MusicChoice::Existing);
                self.music_id = Some(music_id);
            }
            MusicSelection::Upload { music_id } => {
                self.music_choice = Some(MusicChoice::Upload);
                self.music_id = Some(music_id);
            }
            MusicSelection::None => {
                self.music_choice = Some(MusicChoice::None);
                self.music_id = None;
            }
        }
    }

    /// Clears every collected field, keeping the session identity.
    pub fn reset(&mut self) {
        self.campaign_name = None;
        self.objective = None;
        self.text = None;
        self.cta = None;
        self.music_choice = None;
        self.music_id = None;
    }

    /// Packages the state into the submission payload, or `None` while any
    /// payload-carried field is still missing.
    pub fn payload(&self) -> Option<AdPayload> {
        Some(AdPayload {
            campaign_name: self.campaign_name.clone()?,
            objective: self.objective?,
            creative: Creative {
                text: self.text.clone()?,
                cta: self.cta.clone()?,
                music_id: self.music_id.clone(),
            },
        })
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            session_id: self.session_id.clone(),
            campaign_name: self.campaign_name.clone(),
            objective: self.objective,
            text: self.text.clone(),
            cta: self.cta.clone(),
            music_choice: self.music_choice,
            music_id: self.music_id.clone(),
        }
    }
}

/// Read-only serializable view of a session, echoed in transport replies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub session_id: SessionId,
    pub campaign_name: Option<String>,
    pub objective: Option<Objective>,
    pub text: Option<String>,
    pub cta: Option<String>,
    pub music_choice: Option<MusicChoice>,
    pub music_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::domain::campaign::{MusicChoice, MusicSelection, Objective, SessionId};
    use crate::fields::FieldName;
    use crate::outcome::FailureKind;

    use super::ConversationState;

    fn session() -> ConversationState {
        ConversationState::new(SessionId("conv_test".to_string()))
    }

    #[test]
    fn rejected_assignment_leaves_state_unchanged() {
        let mut state = session();
        let failure = state.assign(FieldName::CampaignName, "Ab").expect_err("too short");
        assert_eq!(failure.kind, FailureKind::TooShort);
        assert_eq!(state.campaign_name(), None);
    }

    #[test]
    fn accepted_assignment_stores_trimmed_value() {
        let mut state = session();
        state.assign(FieldName::CampaignName, "  Summer Launch  ").expect("valid name");
        assert_eq!(state.campaign_name(), Some("Summer Launch"));

        state.assign(FieldName::Objective, "Traffic").expect("valid objective");
        assert_eq!(state.objective(), Some(Objective::Traffic));
    }

    #[test]
    fn music_fields_are_not_chat_assignable() {
        let mut state = session();
        let failure = state.assign(FieldName::MusicChoice, "upload").expect_err("wrong path");
        assert_eq!(failure.kind, FailureKind::InvalidEnum);
        assert_eq!(state.music_choice(), None);
    }

    #[test]
    fn committed_track_selection_keeps_choice_and_id_in_sync() {
        let mut state = session();
        state.commit_music(MusicSelection::Existing { music_id: "music_abc123".to_string() });
        assert_eq!(state.music_choice(), Some(MusicChoice::Existing));
        assert_eq!(state.music_id(), Some("music_abc123"));

        // switching to none clears the previously selected track
        state.commit_music(MusicSelection::None);
        assert_eq!(state.music_choice(), Some(MusicChoice::None));
        assert_eq!(state.music_id(), None);
    }

    #[test]
    fn reset_clears_all_fields_but_keeps_session_identity() {
        let mut state = session();
        state.assign(FieldName::CampaignName, "Summer Launch").expect("valid name");
        state.commit_music(MusicSelection::Upload { music_id: "music_9f3a11".to_string() });

        state.reset();

        assert_eq!(state.campaign_name(), None);
        assert_eq!(state.music_choice(), None);
        assert_eq!(state.music_id(), None);
        assert_eq!(state.session_id().0, "conv_test");
    }

    #[test]
    fn payload_is_none_until_required_fields_are_present() {
        let mut state = session();
        assert!(state.payload().is_none());

        state.assign(FieldName::CampaignName, "Summer Launch").expect("name");
        state.assign(FieldName::Objective, "Traffic").expect("objective");
        state.assign(FieldName::Text, "Fresh drops every Friday").expect("text");
        assert!(state.payload().is_none(), "cta still missing");

        state.assign(FieldName::Cta, "Shop Now").expect("cta");
        let payload = state.payload().expect("all payload fields present");
        assert_eq!(payload.campaign_name, "Summer Launch");
        assert_eq!(payload.creative.music_id, None);
    }
}
