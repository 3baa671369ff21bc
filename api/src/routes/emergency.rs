use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use raildesk_core::escalation::escalate;
use raildesk_core::handler::ComplaintOutcome;

use crate::error::AppError;
use crate::routes::complaints::validate_complaint;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/emergency", post(create_emergency))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmergencyRequest {
    /// Free-text emergency report
    pub complaint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmergencyResponse {
    pub success: bool,
    pub data: ComplaintOutcome,
    pub alert: String,
    /// Timestamp-derived reference, e.g. "EMR-2026-08-23-141503"
    pub reference_id: String,
}

/// Escalate an emergency report
///
/// Always treated as urgent: a dedicated emergency record is written first,
/// then the report runs through the standard complaint pipeline. The
/// returned reason is forced to "emergency".
#[utoipa::path(
    post,
    path = "/api/emergency",
    request_body = EmergencyRequest,
    responses(
        (status = 200, description = "Emergency escalated", body = EmergencyResponse),
        (status = 400, description = "Missing or empty complaint", body = crate::error::ApiError),
        (status = 500, description = "Emergency record could not be written", body = crate::error::ApiError)
    ),
    tag = "complaints"
)]
pub async fn create_emergency(
    State(state): State<AppState>,
    Json(req): Json<EmergencyRequest>,
) -> Result<Json<EmergencyResponse>, AppError> {
    let text = validate_complaint(req.complaint.as_deref())?;

    let outcome = escalate(&state.handler, &text).await?;

    Ok(Json(EmergencyResponse {
        success: true,
        data: ComplaintOutcome {
            response: outcome.response,
            urgent: outcome.urgent,
            reason: outcome.reason,
        },
        alert: outcome.alert,
        reference_id: outcome.reference_id,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use raildesk_core::handler::ComplaintHandler;
    use raildesk_core::llm::{LlmError, ReplyGenerator};
    use raildesk_core::store::{LogCategory, LogStore};

    use super::router;
    use crate::state::AppState;

    struct DownBackend;

    #[async_trait]
    impl ReplyGenerator for DownBackend {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_text: &str,
            _temperature: f64,
        ) -> Result<String, LlmError> {
            Err(LlmError::EmptyReply)
        }
    }

    #[tokio::test]
    async fn emergency_endpoint_escalates_even_without_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        let state = AppState {
            handler: Arc::new(ComplaintHandler::new(store.clone(), Arc::new(DownBackend))),
            store: store.clone(),
        };
        let app = router().with_state(state);

        let request = Request::builder()
            .method("POST")
            .uri("/api/emergency")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"complaint": "explosion near platform 2"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["urgent"], true);
        assert_eq!(value["data"]["reason"], "emergency");
        assert!(
            value["reference_id"]
                .as_str()
                .unwrap()
                .starts_with("EMR-")
        );

        let emergencies = store.read(LogCategory::Emergency).unwrap();
        assert_eq!(emergencies.len(), 1);
        assert_eq!(emergencies[0]["priority"], "CRITICAL");
    }
}
