//! Course catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use cgp_common::projection::{course_funnel, CourseFunnel};
use cgp_common::{Course, CourseDraft};

use crate::{ApiError, ApiResult, AppState};

/// GET /api/courses
pub async fn list_courses(State(state): State<AppState>) -> Json<Vec<Course>> {
    Json(state.data.read(|e| e.courses.clone()).await)
}

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(draft): Json<CourseDraft>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    let course = state.data.add_course(draft).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// PUT /api/courses/:id
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<CourseDraft>,
) -> ApiResult<Json<Course>> {
    Ok(Json(state.data.update_course(&id, draft).await?))
}

/// DELETE /api/courses/:id
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.data.delete_course(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/courses/:id/funnel
///
/// Lead counts per stage for the leads interested in this course.
pub async fn get_course_funnel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourseFunnel>> {
    state
        .data
        .read(|e| e.course(&id).map(|c| course_funnel(c, &e.leads)))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", id)))
}

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/:id",
            axum::routing::put(update_course).delete(delete_course),
        )
        .route("/api/courses/:id/funnel", get(get_course_funnel))
}
