//! Lead endpoints
//!
//! Listing with the course filter, create/edit through the lead form, and
//! stage moves from the Kanban board.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use cgp_common::projection::filter_by_course;
use cgp_common::{Lead, LeadDraft, LeadStatus};
use serde::Deserialize;
use tracing::debug;

use super::CourseFilter;
use crate::{ApiResult, AppState};

/// Body of `POST /api/leads/:id/move`
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub status: LeadStatus,
    /// Required when moving to the declined stage
    #[serde(default)]
    pub reason: Option<String>,
}

/// GET /api/leads
pub async fn list_leads(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Json<Vec<Lead>> {
    let leads = state
        .data
        .read(|e| filter_by_course(&e.leads, filter.title()))
        .await;
    debug!(course = ?filter.title(), count = leads.len(), "Listing leads");
    Json(leads)
}

/// POST /api/leads
pub async fn create_lead(
    State(state): State<AppState>,
    Json(draft): Json<LeadDraft>,
) -> ApiResult<(StatusCode, Json<Lead>)> {
    let lead = state.data.add_lead(draft).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// PUT /api/leads/:id
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<LeadDraft>,
) -> ApiResult<Json<Lead>> {
    Ok(Json(state.data.update_lead(&id, draft).await?))
}

/// POST /api/leads/:id/move
pub async fn move_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<Json<Lead>> {
    let lead = state
        .data
        .move_lead(&id, request.status, request.reason.as_deref())
        .await?;
    Ok(Json(lead))
}

pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/:id", put(update_lead))
        .route("/api/leads/:id/move", post(move_lead))
}
