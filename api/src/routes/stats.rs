use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use raildesk_core::stats::{ComplaintStats, complaint_stats};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(get_stats))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub data: ComplaintStats,
    pub timestamp: String,
}

/// Complaint statistics for the dashboard
///
/// Derived from the general log on every call. An unreadable log yields
/// all-zero counts rather than an error.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Aggregated complaint counts", body = StatsResponse)
    ),
    tag = "dashboard"
)]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        success: true,
        data: complaint_stats(&state.store),
        timestamp: Utc::now().to_rfc3339(),
    })
}
