use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

use crate::config::{FetchSettings, LlmSettings};
use crate::domain::{AuditReport, CategoryKey, CategoryResult, CheckRecord, CheckStatus, Impact};
use crate::error::AppError;
use crate::service::recommendation::{RecommendationClient, EMPTY_RESPONSE};

fn client(base_url: &str) -> RecommendationClient {
    let fetch = FetchSettings {
        llm_timeout: Duration::from_millis(500),
        ..FetchSettings::default()
    };
    let settings = LlmSettings {
        base_url: base_url.to_string(),
        ..LlmSettings::default()
    };
    RecommendationClient::new(&fetch, settings).unwrap()
}

fn report() -> AuditReport {
    let mut report = AuditReport::new("https://example.com");
    report.insert(
        CategoryKey::Onpage,
        CategoryResult::from_checks(vec![CheckRecord::new(
            "Title Tag Present",
            CheckStatus::Fail,
            "Page title exists",
            "Missing",
            "Add a unique title tag",
            Impact::Critical,
            Some("Title & Meta"),
        )]),
    );
    report
}

#[tokio::test]
async fn generated_text_is_returned_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "model": "llama3.1:latest", "stream": false })),
            Matcher::Regex("Title Tag Present: Missing".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "response": "1. PRIORITY FIXES\n- add a title" }).to_string())
        .create_async()
        .await;

    let llm = client(&server.url());
    let text = llm.recommend(&report(), "https://example.com").await.unwrap();

    mock.assert_async().await;
    assert_eq!(text, "1. PRIORITY FIXES\n- add a title");
    assert_eq!(llm.model_family(), "llama3.1");
}

#[tokio::test]
async fn missing_response_field_uses_placeholder() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let text = client(&server.url())
        .recommend(&report(), "https://example.com")
        .await
        .unwrap();
    assert_eq!(text, EMPTY_RESPONSE);
}

#[tokio::test]
async fn non_200_maps_to_status_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/generate")
        .with_status(502)
        .create_async()
        .await;

    let err = client(&server.url())
        .recommend(&report(), "https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LlmStatus(502)));
}

#[tokio::test]
async fn unreachable_server_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .recommend(&report(), "https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LlmUnavailable), "{err:?}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let err = client(&format!("http://{addr}"))
        .recommend(&report(), "https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LlmTimeout), "{err:?}");
}
