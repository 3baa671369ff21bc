use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use raildesk_core::store::LogCategory;

use crate::error::AppError;
use crate::state::AppState;

/// Responses are capped to the newest entries so the dashboard never pulls
/// an unbounded array.
const MAX_RETURNED_ENTRIES: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/logs/{log_type}", get(get_logs))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogsResponse {
    pub success: bool,
    /// Entries, newest first
    pub data: Vec<serde_json::Value>,
    pub count: usize,
    pub log_type: String,
}

fn category_for(log_type: &str) -> Option<LogCategory> {
    match log_type {
        "chat" => Some(LogCategory::General),
        "urgent" => Some(LogCategory::Urgent),
        "normal" => Some(LogCategory::Normal),
        "emergency" => Some(LogCategory::Emergency),
        _ => None,
    }
}

/// Read complaint logs
///
/// Returns the last 50 entries of the requested category, newest first.
#[utoipa::path(
    get,
    path = "/api/logs/{log_type}",
    params(
        ("log_type" = String, Path, description = "One of: chat, urgent, normal, emergency")
    ),
    responses(
        (status = 200, description = "Log entries, newest first", body = LogsResponse),
        (status = 400, description = "Unknown log type", body = crate::error::ApiError)
    ),
    tag = "dashboard"
)]
pub async fn get_logs(
    State(state): State<AppState>,
    Path(log_type): Path<String>,
) -> Result<Json<LogsResponse>, AppError> {
    let Some(category) = category_for(&log_type) else {
        return Err(AppError::Validation {
            message: format!("invalid log type '{log_type}'"),
            field: Some("log_type".to_string()),
            docs_hint: Some("Use one of: chat, urgent, normal, emergency".to_string()),
        });
    };

    let mut entries = state.store.read(category)?;
    let skip = entries.len().saturating_sub(MAX_RETURNED_ENTRIES);
    let mut data = entries.split_off(skip);
    data.reverse();

    Ok(Json(LogsResponse {
        success: true,
        count: data.len(),
        data,
        log_type,
    }))
}
