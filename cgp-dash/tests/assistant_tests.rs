//! Assistant tests against a mock generateContent endpoint

use cgp_common::fixtures;
use cgp_dash::assistant::{
    Assistant, GeminiClient, CHAT_EMPTY_TEXT, CHAT_FAILED_TEXT, INSIGHTS_FAILED_TEXT,
};
use mockito::{Matcher, Server, ServerGuard};

const MODEL: &str = "gemini-2.5-flash";
const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn assistant_for(server: &ServerGuard) -> Assistant {
    let client = GeminiClient::new("test-api-key", MODEL, &server.url()).unwrap();
    Assistant::new(Some(client))
}

fn candidate(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "index": 0
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_chat_sends_system_instruction() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-api-key".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Como vender o curso c1?" }] }]
            })),
            Matcher::Regex("systemInstruction".into()),
            Matcher::Regex("CGP Sales Mentor".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate("Use **SPIN Selling**."))
        .create_async()
        .await;

    let text = assistant_for(&server)
        .chat(
            "Como vender o curso c1?",
            &fixtures::courses(),
            &fixtures::instructors(),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(text, "Use **SPIN Selling**.");
}

#[tokio::test]
async fn test_insights_prompt_carries_figures() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("Elis: sold R\\$180000".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate("Destaque: Elis."))
        .create_async()
        .await;

    let text = assistant_for(&server)
        .generate_insights(&fixtures::courses(), &fixtures::sellers())
        .await;

    mock.assert_async().await;
    assert_eq!(text, "Destaque: Elis.");
}

#[tokio::test]
async fn test_empty_candidates_fall_back() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    let text = assistant_for(&server).chat("Oi", &[], &[]).await;
    assert_eq!(text, CHAT_EMPTY_TEXT);
}

#[tokio::test]
async fn test_api_failure_falls_back() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal")
        .expect(2)
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    assert_eq!(assistant.chat("Oi", &[], &[]).await, CHAT_FAILED_TEXT);
    assert_eq!(
        assistant.generate_insights(&[], &[]).await,
        INSIGHTS_FAILED_TEXT
    );
}
