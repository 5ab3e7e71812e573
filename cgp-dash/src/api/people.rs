//! Instructor and seller directories

use axum::{extract::State, routing::get, Json, Router};
use cgp_common::analytics::seller_ranking;
use cgp_common::{Instructor, Seller};

use crate::AppState;

/// GET /api/instructors
pub async fn list_instructors(State(state): State<AppState>) -> Json<Vec<Instructor>> {
    Json(state.data.read(|e| e.instructors.clone()).await)
}

/// GET /api/sellers
pub async fn list_sellers(State(state): State<AppState>) -> Json<Vec<Seller>> {
    Json(state.data.read(|e| e.sellers.clone()).await)
}

/// GET /api/sellers/ranking
///
/// Sellers by total sales, highest first.
pub async fn get_seller_ranking(State(state): State<AppState>) -> Json<Vec<Seller>> {
    Json(state.data.read(|e| seller_ranking(&e.sellers)).await)
}

pub fn people_routes() -> Router<AppState> {
    Router::new()
        .route("/api/instructors", get(list_instructors))
        .route("/api/sellers", get(list_sellers))
        .route("/api/sellers/ranking", get(get_seller_ranking))
}
