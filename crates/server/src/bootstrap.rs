use std::sync::Arc;

use adpilot_agent::runtime::AgentRuntime;
use adpilot_core::audit::{AuditEvent, AuditSink};
use adpilot_core::config::AppConfig;
use adpilot_gateway::music::MockMusicLibrary;
use adpilot_gateway::submission::MockAdPlatform;
use tracing::info;

use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

/// Audit sink that forwards events to the structured log stream.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        info!(
            event_name = %event.event_type,
            category = ?event.category,
            outcome = ?event.outcome,
            session_id = event.session_id.as_ref().map(|id| id.0.as_str()).unwrap_or("unknown"),
            correlation_id = %event.correlation_id,
            actor = %event.actor,
            "audit event"
        );
    }
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        session_id = "unknown",
        "starting application bootstrap"
    );

    let runtime = AgentRuntime::new(
        MockMusicLibrary,
        MockAdPlatform::default(),
        config.platform.access_token.clone(),
        Arc::new(TracingAuditSink),
    );

    Application { config, state: AppState::new(runtime) }
}
