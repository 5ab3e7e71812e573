//! Pipeline KPI endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use cgp_common::metrics::PipelineMetrics;
use cgp_common::projection::filter_by_course;

use super::CourseFilter;
use crate::AppState;

/// GET /api/pipeline
///
/// Board columns and KPIs over the leads matching `?course=`.
pub async fn pipeline_metrics(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Json<PipelineMetrics> {
    let metrics = state
        .data
        .read(|e| {
            let leads = filter_by_course(&e.leads, filter.title());
            PipelineMetrics::compute(&leads, &e.sellers)
        })
        .await;
    Json(metrics)
}

pub fn pipeline_routes() -> Router<AppState> {
    Router::new().route("/api/pipeline", get(pipeline_metrics))
}
