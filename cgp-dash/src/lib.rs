//! cgp-dash library - CGP sales dashboard service
//!
//! Exposes the router and shared state for the binary and the
//! integration tests.

pub mod api;
pub mod assistant;
pub mod error;
pub mod service;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::assistant::Assistant;
use crate::service::DataService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Entity collections and store sync
    pub data: Arc<DataService>,
    /// Generative-AI insight and chat
    pub assistant: Arc<Assistant>,
    /// Held while a store reload is running
    pub refresh_guard: Arc<Mutex<()>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(data: DataService, assistant: Assistant) -> Self {
        Self {
            data: Arc::new(data),
            assistant: Arc::new(assistant),
            refresh_guard: Arc::new(Mutex::new(())),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::lead_routes())
        .merge(api::pipeline_routes())
        .merge(api::course_routes())
        .merge(api::people_routes())
        .merge(api::commission_routes())
        .merge(api::goal_routes())
        .merge(api::feed_routes())
        .merge(api::dashboard_routes())
        .merge(api::ai_routes())
        .merge(api::sse_routes())
        .merge(api::health_routes())
        .with_state(state)
}
