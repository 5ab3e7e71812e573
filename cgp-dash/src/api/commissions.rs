//! Commission rate endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use cgp_common::commission::{quote, CommissionQuote};
use cgp_common::models::SCOPE_ALL;
use cgp_common::{CommissionKind, CommissionRate};
use serde::Deserialize;

use crate::{ApiResult, AppState};

/// Body of `POST /api/commissions`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommissionRate {
    pub rate: f64,
    #[serde(default = "scope_all")]
    pub seller_id: String,
    #[serde(default = "scope_all")]
    pub course_id: String,
    /// Derived from the scope when absent
    pub kind: Option<CommissionKind>,
    pub month: Option<String>,
}

fn scope_all() -> String {
    SCOPE_ALL.to_string()
}

impl NewCommissionRate {
    fn into_rate(self) -> CommissionRate {
        let kind = self.kind.unwrap_or(
            if self.seller_id == SCOPE_ALL && self.course_id == SCOPE_ALL {
                CommissionKind::Standard
            } else {
                CommissionKind::Specific
            },
        );
        CommissionRate {
            id: String::new(),
            rate: self.rate,
            seller_id: self.seller_id,
            course_id: self.course_id,
            kind,
            month: self.month.filter(|m| !m.trim().is_empty()),
        }
    }
}

/// Query of `GET /api/commissions/resolve`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveQuery {
    pub seller_id: Option<String>,
    pub course_id: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
    #[serde(default)]
    pub value: f64,
}

/// GET /api/commissions
pub async fn list_rates(State(state): State<AppState>) -> Json<Vec<CommissionRate>> {
    Json(state.data.read(|e| e.commission_rates.clone()).await)
}

/// POST /api/commissions
pub async fn create_rate(
    State(state): State<AppState>,
    Json(request): Json<NewCommissionRate>,
) -> ApiResult<(StatusCode, Json<CommissionRate>)> {
    let rate = state.data.add_commission_rate(request.into_rate()).await?;
    Ok((StatusCode::CREATED, Json(rate)))
}

/// DELETE /api/commissions/:id
pub async fn delete_rate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.data.delete_commission_rate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/commissions/resolve
///
/// Rate that applies to a sale and the commission on `value`.
pub async fn resolve(
    State(state): State<AppState>,
    Query(q): Query<ResolveQuery>,
) -> Json<CommissionQuote> {
    let result = state
        .data
        .read(|e| {
            quote(
                &e.commission_rates,
                q.seller_id.as_deref(),
                q.course_id.as_deref(),
                q.month.as_deref(),
                q.value,
            )
        })
        .await;
    Json(result)
}

pub fn commission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commissions", get(list_rates).post(create_rate))
        .route("/api/commissions/resolve", get(resolve))
        .route("/api/commissions/:id", delete(delete_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_scope() {
        let request: NewCommissionRate = serde_json::from_str(r#"{"rate": 5}"#).unwrap();
        assert_eq!(request.into_rate().kind, CommissionKind::Standard);

        let request: NewCommissionRate =
            serde_json::from_str(r#"{"rate": 8, "sellerId": "v3", "month": ""}"#).unwrap();
        let rate = request.into_rate();
        assert_eq!(rate.kind, CommissionKind::Specific);
        assert_eq!(rate.course_id, SCOPE_ALL);
        assert_eq!(rate.month, None);
    }
}
