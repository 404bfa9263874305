//! End-to-end tests for the HTTP API, served on an ephemeral port.

use clap::Parser;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

use seo_auditor::commands::AppState;
use seo_auditor::config::ServerConfig;
use seo_auditor::lifecycle::build_router;
use seo_auditor::test_utils::RICH_PAGE;

struct TestApp {
    base: String,
    client: reqwest::Client,
    _static_dir: TempDir,
}

impl TestApp {
    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .expect("request");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("json body"))
    }

    async fn get_text(&self, path: &str) -> (u16, String) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .expect("request");
        let status = resp.status().as_u16();
        (status, resp.text().await.expect("text body"))
    }
}

fn write_site(dir: &Path) {
    std::fs::write(dir.join("index.html"), "INDEX").unwrap();
    std::fs::write(dir.join("analyze.html"), "ANALYZE").unwrap();
    std::fs::write(dir.join("audit.html"), "AUDIT").unwrap();
    std::fs::create_dir(dir.join("assets")).unwrap();
    std::fs::write(dir.join("assets").join("app.js"), "console.log(1)").unwrap();
}

async fn spawn_app(llm_url: &str) -> TestApp {
    let static_dir = tempfile::tempdir().expect("tempdir");
    write_site(static_dir.path());

    let config = ServerConfig::try_parse_from([
        "seo-auditor",
        "--static-dir",
        static_dir.path().to_str().unwrap(),
        "--llm-url",
        llm_url,
    ])
    .expect("config");
    let state = AppState::from_config(&config).expect("state");
    let app = build_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });

    TestApp {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        _static_dir: static_dir,
    }
}

#[tokio::test]
async fn health_publishes_the_check_table() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = app.get_text("/api/health").await;
    assert_eq!(status, 200);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["totalChecks"], 180);
    assert_eq!(
        body["categories"],
        json!({
            "technical": 35, "onpage": 25, "content": 20, "mobile": 15, "performance": 18,
            "security": 12, "social": 10, "local": 15, "geo": 30
        })
    );
}

#[tokio::test]
async fn analyze_requires_a_url() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = app.post("/api/analyze", json!({ "url": "   " })).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn analyze_returns_selected_categories_only() {
    let mut site = mockito::Server::new_async().await;
    site.mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(RICH_PAGE)
        .create_async()
        .await;

    let app = spawn_app("http://127.0.0.1:9").await;
    let url = format!("{}/", site.url());
    let (status, body) = app
        .post(
            "/api/analyze",
            json!({ "url": url, "categories": ["social", "unknown", "onpage"] }),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["url"], url);
    let keys: Vec<&String> = body["categories"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(body["categories"]["onpage"]["total"], 25);
    assert_eq!(body["categories"]["social"]["total"], 10);
    assert_eq!(body["totalChecks"], 35);
    let first = &body["categories"]["onpage"]["checks"][0];
    assert_eq!(first["name"], "Title Tag Present");
    assert_eq!(first["status"], "pass");
    assert_eq!(first["impact"], "Critical");
    assert_eq!(first["category"], "Title & Meta");
}

#[tokio::test]
async fn analyze_with_no_categories_is_empty_not_an_error() {
    let mut site = mockito::Server::new_async().await;
    site.mock("GET", "/")
        .with_status(200)
        .with_body("<p>x</p>")
        .create_async()
        .await;

    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = app
        .post("/api/analyze", json!({ "url": site.url(), "categories": [] }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["categories"], json!({}));
    assert_eq!(body["overallScore"], 0.0);
    assert_eq!(body["totalChecks"], 0);
}

#[tokio::test]
async fn schemeless_url_is_fetched_over_https() {
    // The mock only speaks plain HTTP, so the https:// default fails the fetch.
    let site = mockito::Server::new_async().await;
    let host = site.host_with_port();

    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = app.post("/api/analyze", json!({ "url": host })).await;
    assert_eq!(status, 400);
    assert_eq!(body["url"], format!("https://{host}"));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch URL: "));
}

#[tokio::test]
async fn recommendations_need_audit_results() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = app
        .post("/api/ai-recommendations", json!({ "url": "https://e.com" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Audit results required" }));
}

#[tokio::test]
async fn recommendations_proxy_the_llm() {
    let mut llm = mockito::Server::new_async().await;
    llm.mock("POST", "/generate")
        .with_status(200)
        .with_body(json!({ "response": "Add a meta description." }).to_string())
        .create_async()
        .await;

    let app = spawn_app(&llm.url()).await;
    let audit = json!({
        "url": "https://e.com",
        "categories": {},
        "totalChecks": 0,
        "totalPassed": 0,
        "overallScore": 0.0
    });
    let (status, body) = app
        .post(
            "/api/ai-recommendations",
            json!({ "url": "https://e.com", "auditResults": audit }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "recommendations": "Add a meta description.",
            "model": "llama3.1"
        })
    );
}

#[tokio::test]
async fn llm_failures_keep_their_status() {
    let mut llm = mockito::Server::new_async().await;
    llm.mock("POST", "/generate")
        .with_status(500)
        .create_async()
        .await;

    let app = spawn_app(&llm.url()).await;
    let (status, body) = app
        .post(
            "/api/ai-recommendations",
            json!({ "auditResults": { "overallScore": 10.0 } }),
        )
        .await;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({ "status": "error", "error": "LLM service returned status 500" })
    );
}

#[tokio::test]
async fn static_pages_and_spa_fallback() {
    let app = spawn_app("http://127.0.0.1:9").await;
    for (path, expected) in [
        ("/", "INDEX"),
        ("/analyze", "ANALYZE"),
        ("/audit", "AUDIT"),
        ("/audit/", "AUDIT"),
        ("/audit/example.com", "AUDIT"),
        ("/assets/app.js", "console.log(1)"),
        ("/pricing/enterprise", "INDEX"),
    ] {
        let (status, body) = app.get_text(path).await;
        assert_eq!(status, 200, "{path}");
        assert_eq!(body, expected, "{path}");
    }
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let allowed = app
        .client
        .get(format!("{}/api/health", app.base))
        .header("origin", "https://ai1stseo.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://ai1stseo.com"
    );

    let denied = app
        .client
        .get(format!("{}/api/health", app.base))
        .header("origin", "https://elsewhere.example")
        .send()
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
