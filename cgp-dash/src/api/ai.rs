//! AI assistant endpoints
//!
//! Both endpoints always answer 200; assistant failures come back as the
//! fallback text.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub text: String,
}

/// POST /api/ai/insights
pub async fn insights(State(state): State<AppState>) -> Json<AssistantReply> {
    let (courses, sellers) = state
        .data
        .read(|e| (e.courses.clone(), e.sellers.clone()))
        .await;
    let text = state.assistant.generate_insights(&courses, &sellers).await;
    Json(AssistantReply { text })
}

/// POST /api/ai/chat
///
/// Grounded on the current course and instructor catalog.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<AssistantReply>> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }
    debug!(chars = message.len(), "Chat message received");

    let (courses, instructors) = state
        .data
        .read(|e| (e.courses.clone(), e.instructors.clone()))
        .await;
    let text = state.assistant.chat(message, &courses, &instructors).await;
    Ok(Json(AssistantReply { text }))
}

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/insights", post(insights))
        .route("/api/ai/chat", post(chat))
}
