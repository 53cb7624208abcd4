use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use adpilot_core::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink, NoopAuditSink};
use adpilot_core::domain::campaign::{MusicChoice, MusicSelection, SessionId};
use adpilot_core::domain::session::StateSnapshot;
use adpilot_core::fields::{self, FieldName};
use adpilot_core::gate::{self, SubmissionBlocked};
use adpilot_core::outcome::ValidationFailure;
use adpilot_core::{rules, selector};
use adpilot_gateway::music::{MockMusicLibrary, MusicService};
use adpilot_gateway::submission::{MockAdPlatform, SubmissionReceipt, SubmissionService};
use adpilot_gateway::MOCK_ACCESS_TOKEN;

use crate::sessions::SessionStore;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub agent_message: String,
    pub reasoning: String,
    pub next_expected_field: Option<FieldName>,
    pub conversation_state: StateSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MusicReply {
    pub music_status: String,
    pub music_id: Option<String>,
    pub conversation_state: StateSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error(transparent)]
    Blocked(#[from] SubmissionBlocked),
    #[error(transparent)]
    Platform(ValidationFailure),
}

/// Orchestrates one dialogue turn at a time: the core decides everything,
/// the collaborators are only consulted at the boundary (music lookup,
/// upload, submission), and session state is committed strictly after the
/// relevant checks pass.
pub struct AgentRuntime<M = MockMusicLibrary, P = MockAdPlatform> {
    sessions: SessionStore,
    music: M,
    platform: P,
    credential: SecretString,
    audit: Arc<dyn AuditSink>,
}

impl AgentRuntime<MockMusicLibrary, MockAdPlatform> {
    /// Runtime backed entirely by the deterministic mocks, authenticated
    /// with the token the mock platform expects.
    pub fn with_mock_platform() -> Self {
        Self::new(
            MockMusicLibrary,
            MockAdPlatform::default(),
            String::from(MOCK_ACCESS_TOKEN).into(),
            Arc::new(NoopAuditSink),
        )
    }
}

impl<M, P> AgentRuntime<M, P>
where
    M: MusicService,
    P: SubmissionService,
{
    pub fn new(
        music: M,
        platform: P,
        credential: SecretString,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self { sessions: SessionStore::new(), music, platform, credential, audit }
    }

    /// One chat turn: the raw input is validated against the field the
    /// selector currently expects. Rejection leaves the session untouched so
    /// the same prompt applies on retry; acceptance advances the selector.
    pub fn handle_chat(
        &self,
        session_id: &str,
        input: &str,
    ) -> Result<ChatReply, ValidationFailure> {
        let correlation_id = Uuid::new_v4().to_string();

        self.sessions.with_session(session_id, |state| {
            let Some(spec) = selector::next_field(state) else {
                return Ok(ChatReply {
                    agent_message: selector::COMPLETION_MESSAGE.to_string(),
                    reasoning: selector::COMPLETION_RATIONALE.to_string(),
                    next_expected_field: None,
                    conversation_state: state.snapshot(),
                });
            };

            if spec.field == FieldName::MusicChoice {
                // music is not free-text input; steer the caller to the
                // music selection step without consuming their message
                return Ok(ChatReply {
                    agent_message: spec.prompt.to_string(),
                    reasoning: spec.rationale.to_string(),
                    next_expected_field: Some(spec.field),
                    conversation_state: state.snapshot(),
                });
            }

            if let Err(failure) = state.assign(spec.field, input) {
                self.audit.emit(
                    AuditEvent::new(
                        Some(SessionId(session_id.to_string())),
                        correlation_id.clone(),
                        "dialogue.field_rejected",
                        AuditCategory::Validation,
                        "agent-runtime",
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("field", spec.field.as_str())
                    .with_metadata("error", format!("{:?}", failure.kind)),
                );
                return Err(failure);
            }

            self.audit.emit(
                AuditEvent::new(
                    Some(SessionId(session_id.to_string())),
                    correlation_id.clone(),
                    "dialogue.field_assigned",
                    AuditCategory::Validation,
                    "agent-runtime",
                    AuditOutcome::Success,
                )
                .with_metadata("field", spec.field.as_str()),
            );

            let (agent_message, reasoning, next_expected_field) = match selector::next_field(state)
            {
                Some(next_spec) => {
                    (next_spec.prompt.to_string(), next_spec.rationale.to_string(), Some(next_spec.field))
                }
                None => (
                    selector::COMPLETION_MESSAGE.to_string(),
                    selector::COMPLETION_RATIONALE.to_string(),
                    None,
                ),
            };

            Ok(ChatReply {
                agent_message,
                reasoning,
                next_expected_field,
                conversation_state: state.snapshot(),
            })
        })
    }

    /// The music selection sub-flow. Collaborators are consulted before the
    /// session lock is taken; a rejected choice never partially writes.
    pub async fn handle_music(
        &self,
        session_id: &str,
        choice: &str,
        candidate_id: Option<&str>,
    ) -> Result<MusicReply, ValidationFailure> {
        let correlation_id = Uuid::new_v4().to_string();
        let result = self.music_flow(session_id, choice, candidate_id).await;

        let event = match &result {
            Ok(reply) => AuditEvent::new(
                Some(SessionId(session_id.to_string())),
                correlation_id,
                "music.selection_committed",
                AuditCategory::Validation,
                "agent-runtime",
                AuditOutcome::Success,
            )
            .with_metadata("music_status", reply.music_status.clone()),
            Err(failure) => AuditEvent::new(
                Some(SessionId(session_id.to_string())),
                correlation_id,
                "music.selection_rejected",
                AuditCategory::Validation,
                "agent-runtime",
                AuditOutcome::Rejected,
            )
            .with_metadata("error", format!("{:?}", failure.kind)),
        };
        self.audit.emit(event);

        result
    }

    async fn music_flow(
        &self,
        session_id: &str,
        choice: &str,
        candidate_id: Option<&str>,
    ) -> Result<MusicReply, ValidationFailure> {
        let parsed: MusicChoice = choice.parse()?;

        let selection = match parsed {
            MusicChoice::Existing => {
                let music_id = candidate_id.unwrap_or("").trim();
                fields::validate(FieldName::MusicId, music_id)?;
                self.music.lookup(music_id).await?;
                MusicSelection::Existing { music_id: music_id.to_string() }
            }
            MusicChoice::Upload => {
                let music_id = self.music.upload().await;
                MusicSelection::Upload { music_id }
            }
            MusicChoice::None => MusicSelection::None,
        };

        self.sessions.with_session(session_id, |state| {
            // eager half of the music-required rule; shares its predicate
            // with the submission-time re-check
            if rules::music_required_violated(state.objective(), Some(selection.choice())) {
                return Err(rules::music_required_failure());
            }

            let music_status = match &selection {
                MusicSelection::Existing { .. } => "selected",
                MusicSelection::Upload { .. } => "uploaded",
                MusicSelection::None => "none",
            };
            let music_id = selection.music_id().map(str::to_string);
            state.commit_music(selection);

            Ok(MusicReply {
                music_status: music_status.to_string(),
                music_id,
                conversation_state: state.snapshot(),
            })
        })
    }

    /// Runs the submission gate and, when it passes, hands the packaged
    /// payload to the submission collaborator. Collaborator failures are
    /// surfaced verbatim; the session state is never changed by this path.
    pub async fn handle_submit(
        &self,
        session_id: &str,
    ) -> Result<SubmissionReceipt, SubmitRejection> {
        let correlation_id = Uuid::new_v4().to_string();

        let payload = self
            .sessions
            .with_session(session_id, |state| gate::evaluate(state))
            .map_err(|blocked| {
                self.audit.emit(
                    AuditEvent::new(
                        Some(SessionId(session_id.to_string())),
                        correlation_id.clone(),
                        "submission.gate_rejected",
                        AuditCategory::Rule,
                        "agent-runtime",
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("reason", blocked.to_string()),
                );
                SubmitRejection::Blocked(blocked)
            })?;

        match self.platform.submit(&payload, &self.credential).await {
            Ok(receipt) => {
                self.audit.emit(
                    AuditEvent::new(
                        Some(SessionId(session_id.to_string())),
                        correlation_id,
                        "submission.accepted",
                        AuditCategory::Submission,
                        "agent-runtime",
                        AuditOutcome::Success,
                    )
                    .with_metadata("ad_id", receipt.ad_id.clone()),
                );
                Ok(receipt)
            }
            Err(failure) => {
                self.audit.emit(
                    AuditEvent::new(
                        Some(SessionId(session_id.to_string())),
                        correlation_id,
                        "submission.platform_rejected",
                        AuditCategory::Submission,
                        "agent-runtime",
                        AuditOutcome::Failed,
                    )
                    .with_metadata("error", format!("{:?}", failure.kind)),
                );
                Err(SubmitRejection::Platform(failure))
            }
        }
    }

    /// Clears the session's collected fields between conversations.
    pub fn reset(&self, session_id: &str) -> StateSnapshot {
        let snapshot = self.sessions.with_session(session_id, |state| {
            state.reset();
            state.snapshot()
        });

        self.audit.emit(AuditEvent::new(
            Some(SessionId(session_id.to_string())),
            Uuid::new_v4().to_string(),
            "session.reset",
            AuditCategory::System,
            "agent-runtime",
            AuditOutcome::Success,
        ));

        snapshot
    }

    pub fn snapshot(&self, session_id: &str) -> StateSnapshot {
        self.sessions.with_session(session_id, |state| state.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use adpilot_core::audit::InMemoryAuditSink;
    use adpilot_core::fields::FieldName;
    use adpilot_core::gate::SubmissionBlocked;
    use adpilot_core::outcome::FailureKind;
    use adpilot_gateway::music::MockMusicLibrary;
    use adpilot_gateway::submission::MockAdPlatform;
    use adpilot_gateway::MOCK_ACCESS_TOKEN;

    use super::{AgentRuntime, SubmitRejection};

    const SESSION: &str = "conv_test";

    fn runtime() -> AgentRuntime {
        AgentRuntime::with_mock_platform()
    }

    fn runtime_with_audit(sink: InMemoryAuditSink) -> AgentRuntime {
        AgentRuntime::new(
            MockMusicLibrary,
            MockAdPlatform::default(),
            String::from(MOCK_ACCESS_TOKEN).into(),
            Arc::new(sink),
        )
    }

    fn fill_through_cta(agent: &AgentRuntime, objective: &str) {
        agent.handle_chat(SESSION, "Summer Launch").expect("name");
        agent.handle_chat(SESSION, objective).expect("objective");
        agent.handle_chat(SESSION, "Fresh drops every Friday").expect("text");
        agent.handle_chat(SESSION, "Shop Now").expect("cta");
    }

    #[test]
    fn short_campaign_name_is_rejected_without_consuming_the_slot() {
        let agent = runtime();
        let failure = agent.handle_chat(SESSION, "Ab").expect_err("2 chars must fail");
        assert_eq!(failure.kind, FailureKind::TooShort);

        // state unchanged: the next valid input still lands in campaign_name
        let reply = agent.handle_chat(SESSION, "Summer Launch").expect("valid name");
        assert_eq!(reply.conversation_state.campaign_name.as_deref(), Some("Summer Launch"));
        assert_eq!(reply.next_expected_field, Some(FieldName::Objective));
    }

    #[test]
    fn chat_walks_the_fixed_field_order() {
        let agent = runtime();

        let reply = agent.handle_chat(SESSION, "Summer Launch").expect("name");
        assert_eq!(reply.next_expected_field, Some(FieldName::Objective));

        let reply = agent.handle_chat(SESSION, "Traffic").expect("objective");
        assert_eq!(reply.next_expected_field, Some(FieldName::Text));

        let reply = agent.handle_chat(SESSION, "Fresh drops every Friday").expect("text");
        assert_eq!(reply.next_expected_field, Some(FieldName::Cta));

        let reply = agent.handle_chat(SESSION, "Shop Now").expect("cta");
        assert_eq!(reply.next_expected_field, Some(FieldName::MusicChoice));
        assert_eq!(reply.agent_message, "Choose music option (existing / upload / none)");
    }

    #[test]
    fn chat_does_not_consume_input_while_waiting_on_music() {
        let agent = runtime();
        fill_through_cta(&agent, "Traffic");

        let reply = agent.handle_chat(SESSION, "whatever").expect("steering reply");
        assert_eq!(reply.next_expected_field, Some(FieldName::MusicChoice));
        assert_eq!(reply.conversation_state.music_choice, None);
    }

    #[tokio::test]
    async fn upload_choice_commits_a_generated_id() {
        let agent = runtime();
        let reply = agent.handle_music(SESSION, "upload", None).await.expect("upload succeeds");

        assert_eq!(reply.music_status, "uploaded");
        let id = reply.music_id.expect("uploaded id");
        assert!(id.starts_with("music_"));
        assert_eq!(reply.conversation_state.music_id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn existing_choice_with_bad_id_leaves_state_untouched() {
        let agent = runtime();
        let failure = agent
            .handle_music(SESSION, "existing", Some("bad123"))
            .await
            .expect_err("lookup must fail");

        assert_eq!(failure.kind, FailureKind::InvalidMusicId);
        let snapshot = agent.snapshot(SESSION);
        assert_eq!(snapshot.music_choice, None);
        assert_eq!(snapshot.music_id, None);
    }

    #[tokio::test]
    async fn existing_choice_without_id_is_missing_music_id() {
        let agent = runtime();
        let failure = agent
            .handle_music(SESSION, "existing", None)
            .await
            .expect_err("missing id must fail");
        assert_eq!(failure.kind, FailureKind::MissingMusicId);
    }

    #[tokio::test]
    async fn none_choice_is_rejected_eagerly_under_conversions() {
        let agent = runtime();
        agent.handle_chat(SESSION, "Summer Launch").expect("name");
        agent.handle_chat(SESSION, "Conversions").expect("objective");

        let failure =
            agent.handle_music(SESSION, "none", None).await.expect_err("rule must fire eagerly");
        assert_eq!(failure.kind, FailureKind::MusicRequired);

        let snapshot = agent.snapshot(SESSION);
        assert_eq!(snapshot.music_choice, None, "rejected choice must not be written");
    }

    #[tokio::test]
    async fn traffic_campaign_without_music_submits_successfully() {
        let agent = runtime();
        fill_through_cta(&agent, "Traffic");
        agent.handle_music(SESSION, "none", None).await.expect("none is fine for traffic");

        let receipt = agent.handle_submit(SESSION).await.expect("gate and platform pass");
        assert!(receipt.ad_id.starts_with("ad_"));
        assert_eq!(receipt.submitted_payload.campaign_name, "Summer Launch");
        assert_eq!(receipt.submitted_payload.creative.music_id, None);
    }

    #[tokio::test]
    async fn late_objective_flip_is_caught_at_submission_time() {
        let agent = runtime();
        fill_through_cta(&agent, "Traffic");
        agent.handle_music(SESSION, "none", None).await.expect("none under traffic");

        // each write above was individually valid; flipping the objective
        // afterwards creates the conflict only the gate can see (the chat
        // path never revisits filled fields, so go through the store)
        agent
            .sessions
            .with_session(SESSION, |state| state.assign(FieldName::Objective, "Conversions"))
            .expect("objective reassignment");

        let rejection = agent.handle_submit(SESSION).await.expect_err("rule must block");
        match rejection {
            SubmitRejection::Blocked(SubmissionBlocked::RuleViolation(failure)) => {
                assert_eq!(failure.kind, FailureKind::MusicRequired);
            }
            other => panic!("expected music-required rule violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn incomplete_session_reports_every_missing_field_at_submit() {
        let agent = runtime();
        agent.handle_chat(SESSION, "Summer Launch").expect("name");

        let rejection = agent.handle_submit(SESSION).await.expect_err("incomplete state");
        match rejection {
            SubmitRejection::Blocked(blocked) => {
                assert_eq!(
                    blocked.violated_fields(),
                    vec![
                        FieldName::Objective,
                        FieldName::Text,
                        FieldName::Cta,
                        FieldName::MusicChoice
                    ]
                );
            }
            other => panic!("expected gate rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn platform_failure_passes_through_verbatim() {
        let agent = runtime();
        agent.handle_chat(SESSION, "no_permission").expect("reserved name is 13 chars");
        agent.handle_chat(SESSION, "Traffic").expect("objective");
        agent.handle_chat(SESSION, "Fresh drops every Friday").expect("text");
        agent.handle_chat(SESSION, "Shop Now").expect("cta");
        agent.handle_music(SESSION, "none", None).await.expect("none under traffic");

        let rejection = agent.handle_submit(SESSION).await.expect_err("platform must reject");
        match rejection {
            SubmitRejection::Platform(failure) => {
                assert_eq!(failure.kind, FailureKind::MissingPermission);
                assert!(!failure.retry_allowed);
            }
            other => panic!("expected platform rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let agent = runtime();
        agent.handle_chat("conv_a", "Summer Launch").expect("name in a");

        let reply = agent.handle_chat("conv_b", "Winter Launch").expect("name in b");
        assert_eq!(reply.conversation_state.campaign_name.as_deref(), Some("Winter Launch"));
        assert_eq!(agent.snapshot("conv_a").campaign_name.as_deref(), Some("Summer Launch"));
    }

    #[test]
    fn reset_clears_the_session() {
        let agent = runtime();
        agent.handle_chat(SESSION, "Summer Launch").expect("name");

        let snapshot = agent.reset(SESSION);
        assert_eq!(snapshot.campaign_name, None);
    }

    #[test]
    fn audit_trail_records_assignments_and_rejections() {
        let sink = InMemoryAuditSink::default();
        let agent = runtime_with_audit(sink.clone());

        agent.handle_chat(SESSION, "Summer Launch").expect("name");
        agent.handle_chat(SESSION, "sideways").expect_err("bad objective");

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "dialogue.field_assigned");
        assert_eq!(events[1].event_type, "dialogue.field_rejected");
        assert_eq!(events[1].metadata.get("field").map(String::as_str), Some("objective"));
    }
}
