//! Dashboard overview and store reload

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use cgp_common::analytics::{
    bonus_tier_reached, group_by_month, overview, viability_alerts, MonthGroup, Overview,
    ViabilityAlert,
};
use cgp_common::BonusTier;
use serde::Serialize;
use tracing::info;

use crate::service::RefreshSummary;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub overview: Overview,
    pub months: Vec<MonthGroup>,
    pub viability_alerts: Vec<ViabilityAlert>,
    /// Highest bonus tier the current revenue reaches
    pub bonus_tier: Option<BonusTier>,
}

/// GET /api/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let today = Local::now().date_naive();
    let response = state
        .data
        .read(|e| {
            let overview = overview(&e.courses, &e.global_goal);
            DashboardResponse {
                bonus_tier: bonus_tier_reached(&e.global_goal, overview.goal_percent),
                overview,
                months: group_by_month(&e.courses),
                viability_alerts: viability_alerts(&e.courses, today),
            }
        })
        .await;
    Json(response)
}

/// POST /api/refresh
///
/// Reload every collection from the store. Rejected while another reload
/// is running.
pub async fn refresh(State(state): State<AppState>) -> ApiResult<Json<RefreshSummary>> {
    let _guard = state
        .refresh_guard
        .try_lock()
        .map_err(|_| ApiError::Conflict("A refresh is already running".to_string()))?;
    info!("Refresh requested");
    Ok(Json(state.data.refresh().await))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/refresh", post(refresh))
}
