//! Notification and activity feed endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cgp_common::{ActivityLog, Notification, NotificationKind};
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

/// Body of `POST /api/notifications`
#[derive(Debug, Deserialize)]
pub struct NewNotification {
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

/// GET /api/notifications
pub async fn list_notifications(State(state): State<AppState>) -> Json<NotificationList> {
    let list = state
        .data
        .read(|e| NotificationList {
            unread: e.unread_notifications(),
            notifications: e.notifications.clone(),
        })
        .await;
    Json(list)
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<NewNotification>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    let notification = state
        .data
        .add_notification(&request.title, &request.message, request.kind)
        .await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.data.mark_notification_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/activities
///
/// Most recent first.
pub async fn list_activities(State(state): State<AppState>) -> Json<Vec<ActivityLog>> {
    Json(state.data.read(|e| e.activities.clone()).await)
}

pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/api/notifications/:id/read", post(mark_read))
        .route("/api/activities", get(list_activities))
}
