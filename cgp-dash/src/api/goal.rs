//! Global goal endpoints

use axum::{extract::State, routing::get, Json, Router};
use cgp_common::analytics::{team_goals, TeamGoals};
use cgp_common::GlobalGoal;

use crate::{ApiResult, AppState};

/// GET /api/goal
pub async fn get_goal(State(state): State<AppState>) -> Json<GlobalGoal> {
    Json(state.data.read(|e| e.global_goal.clone()).await)
}

/// PUT /api/goal
pub async fn put_goal(
    State(state): State<AppState>,
    Json(goal): Json<GlobalGoal>,
) -> ApiResult<Json<GlobalGoal>> {
    Ok(Json(state.data.update_goal(goal).await?))
}

/// GET /api/goal/team
///
/// Each seller's annual goal as a share of the global target.
pub async fn get_team_goals(State(state): State<AppState>) -> Json<TeamGoals> {
    Json(state.data.read(|e| team_goals(&e.sellers, &e.global_goal)).await)
}

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/api/goal", get(get_goal).put(put_goal))
        .route("/api/goal/team", get(get_team_goals))
}
