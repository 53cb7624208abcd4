use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub checked_at: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "adpilot-server runtime initialized".to_string(),
        },
        checked_at: Utc::now().to_rfc3339(),
    })
}
