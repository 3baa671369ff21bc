use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use raildesk_core::handler::ComplaintOutcome;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/complaint", post(create_complaint))
        .route("/api/query", post(query))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ComplaintRequest {
    /// Free-text passenger complaint
    pub complaint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintResponse {
    pub success: bool,
    pub data: ComplaintOutcome,
    pub timestamp: String,
}

/// Reject missing or empty complaint text before the pipeline runs.
pub(crate) fn validate_complaint(complaint: Option<&str>) -> Result<String, AppError> {
    let text = complaint.unwrap_or("").trim();
    if text.is_empty() {
        return Err(AppError::Validation {
            message: "complaint text must not be empty".to_string(),
            field: Some("complaint".to_string()),
            docs_hint: Some(
                "Send {\"complaint\": \"<free-text passenger complaint>\"}".to_string(),
            ),
        });
    }
    Ok(text.to_string())
}

/// Handle a passenger complaint
///
/// Classifies urgency, obtains an empathetic reply (falling back to a
/// deterministic template when the model is unavailable), and appends the
/// interaction to the general plus urgent/normal logs.
#[utoipa::path(
    post,
    path = "/api/complaint",
    request_body = ComplaintRequest,
    responses(
        (status = 200, description = "Complaint processed", body = ComplaintResponse),
        (status = 400, description = "Missing or empty complaint", body = crate::error::ApiError),
        (status = 500, description = "Complaint could not be recorded", body = crate::error::ApiError)
    ),
    tag = "complaints"
)]
pub async fn create_complaint(
    State(state): State<AppState>,
    Json(req): Json<ComplaintRequest>,
) -> Result<Json<ComplaintResponse>, AppError> {
    let text = validate_complaint(req.complaint.as_deref())?;
    tracing::info!(complaint = %head(&text), "new complaint");

    let data = state.handler.handle(&text).await?;

    Ok(Json(ComplaintResponse {
        success: true,
        data,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// General query endpoint (alias for /api/complaint)
#[utoipa::path(
    post,
    path = "/api/query",
    request_body = ComplaintRequest,
    responses(
        (status = 200, description = "Complaint processed", body = ComplaintResponse),
        (status = 400, description = "Missing or empty complaint", body = crate::error::ApiError)
    ),
    tag = "complaints"
)]
pub async fn query(
    state: State<AppState>,
    req: Json<ComplaintRequest>,
) -> Result<Json<ComplaintResponse>, AppError> {
    create_complaint(state, req).await
}

/// First 100 characters, for log lines only.
fn head(text: &str) -> String {
    text.chars().take(100).collect()
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
    use raildesk_core::store::LogStore;

    use super::{router, validate_complaint};
    use crate::state::AppState;

    struct CannedReply;

    #[async_trait]
    impl ReplyGenerator for CannedReply {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_text: &str,
            _temperature: f64,
        ) -> Result<String, LlmError> {
            Ok("We are looking into it.".to_string())
        }
    }

    fn test_state(dir: &std::path::Path) -> AppState {
        let store = LogStore::new(dir);
        AppState {
            handler: Arc::new(ComplaintHandler::new(store.clone(), Arc::new(CannedReply))),
            store,
        }
    }

    #[test]
    fn empty_and_missing_complaints_are_rejected() {
        assert!(validate_complaint(None).is_err());
        assert!(validate_complaint(Some("")).is_err());
        assert!(validate_complaint(Some("   ")).is_err());
        assert_eq!(validate_complaint(Some("  late train  ")).unwrap(), "late train");
    }

    #[tokio::test]
    async fn complaint_endpoint_returns_classification() {
        let dir = tempfile::tempdir().unwrap();
        let app = router().with_state(test_state(dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/complaint")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"complaint": "There was a fire in coach B3"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["urgent"], true);
        assert_eq!(value["data"]["reason"], "fire");
        assert_eq!(value["data"]["response"], "We are looking into it.");
    }

    #[tokio::test]
    async fn empty_complaint_returns_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = router().with_state(test_state(dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/complaint")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"complaint": "   "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "validation_failed");
        assert_eq!(value["field"], "complaint");
    }
}
