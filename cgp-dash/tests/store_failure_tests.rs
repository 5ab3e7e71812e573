//! Write policy when the backing store rejects writes
//!
//! Reads succeed against a mock PostgREST server while every insert,
//! patch and delete answers 500.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cgp_common::events::EventBus;
use cgp_dash::assistant::Assistant;
use cgp_dash::service::DataService;
use cgp_dash::store::{RestStore, TableStore};
use cgp_dash::{build_router, AppState};
use http_body_util::BodyExt;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use tower::util::ServiceExt;

const LEAD_ID: &str = "3b6f2a8e-5c1d-4e7a-9f20-8d4c6b1a7e55";
const COURSE_ID: &str = "9e4d7c21-0b3a-4f68-a5d2-61c8e0f4b937";

struct FailingStore {
    server: ServerGuard,
    patch: Mock,
    delete: Mock,
}

/// Mock server with one lead and one course that rejects every write
async fn failing_store() -> FailingStore {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rest/v1/leads")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": LEAD_ID,
                "nome": "Marcos Teixeira",
                "empresa": "Prefeitura de Mossoró",
                "status": "Em Análise",
                "valor_potencial": 8400,
                "quantidade_inscricoes": 3,
                "curso_id": COURSE_ID,
                "data_cadastro": "2026-09-14"
            }])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/cursos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": COURSE_ID,
                "tema": "Gestão de Contratos",
                "cidade": "Natal",
                "estado": "RN",
                "data_inicio": "2026-11-18",
                "data_fim": "2026-11-20",
                "valor_inscricao": 2800,
                "inscritos": 12,
                "status": "Agendado"
            }])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock(
            "GET",
            Matcher::Regex(
                r"^/rest/v1/(vendedoras|professores|taxas_comissao|metas_globais|notificacoes|activity_logs)$"
                    .to_string(),
            ),
        )
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    server
        .mock("POST", Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"database is down"}"#)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", Matcher::Any)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"database is down"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", Matcher::Any)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"database is down"}"#)
        .create_async()
        .await;

    FailingStore { server, patch, delete }
}

async fn create_app(server: &ServerGuard) -> axum::Router {
    let store: Arc<dyn TableStore> = Arc::new(RestStore::new(&server.url(), "anon-test-key").unwrap());
    let data = DataService::new(Some(store), EventBus::new(64));
    let summary = data.refresh().await;
    assert_eq!(summary.leads, 1);
    assert_eq!(summary.courses, 1);
    assert_eq!(summary.commission_rates, 0);
    build_router(AppState::new(data, Assistant::new(None)))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn count(app: &axum::Router, uri: &str) -> usize {
    let (status, list) = send(app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    list.as_array().unwrap().len()
}

#[tokio::test]
async fn test_failed_inserts_leave_collections_unchanged() {
    let store = failing_store().await;
    let app = create_app(&store.server).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/leads",
        Some(json!({
            "name": "Paula Mendes",
            "organization": "Prefeitura de Natal",
            "ownerId": "v7",
            "standardValue": 2800.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
    assert_eq!(count(&app, "/api/leads").await, 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/courses",
        Some(json!({
            "title": "Orçamento Público",
            "city": "Fortaleza",
            "state": "CE",
            "startDate": "2027-02-10",
            "endDate": "2027-02-12",
            "seatPrice": 2100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
    assert_eq!(count(&app, "/api/courses").await, 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/commissions",
        Some(json!({ "rate": 12.0, "sellerId": "v9", "courseId": COURSE_ID })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
    assert_eq!(count(&app, "/api/commissions").await, 0);

    // no activity is logged for a lead that was never created
    assert_eq!(count(&app, "/api/activities").await, 0);
}

#[tokio::test]
async fn test_failed_update_and_delete_still_apply_locally() {
    let store = failing_store().await;
    let app = create_app(&store.server).await;

    let (status, moved) = send(
        &app,
        "POST",
        &format!("/api/leads/{}/move", LEAD_ID),
        Some(json!({ "status": "Inscrito" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "Inscrito");

    let (_, leads) = send(&app, "GET", "/api/leads", None).await;
    assert_eq!(leads[0]["status"], "Inscrito");

    // the activity append fails remotely but stays in the local feed
    let (_, activities) = send(&app, "GET", "/api/activities", None).await;
    assert_eq!(activities.as_array().unwrap().len(), 1);
    assert_eq!(activities[0]["message"], "New enrollment confirmed");

    let (status, _) = send(&app, "DELETE", &format!("/api/courses/{}", COURSE_ID), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(count(&app, "/api/courses").await, 0);

    store.patch.assert_async().await;
    store.delete.assert_async().await;
}
