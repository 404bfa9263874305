//! Process lifecycle: logging, router assembly, serving and shutdown.

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{self, AppState};
use crate::config::ServerConfig;
use crate::domain::CategoryKey;
use crate::service::auditor::health_report;

const DEFAULT_LOG_FILTER: &str = "info,seo_auditor=debug,tower_http=info";

/// Initialize logging with tracing_subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .with_ansi(true)
        .init();
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("[HTTP] Ignoring CORS origin {:?}: {}", o, e);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let pages = commands::pages::router(&state.static_dir);
    Router::new()
        .route("/api/analyze", post(commands::analysis::analyze))
        .route("/api/health", get(commands::health::health))
        .route(
            "/api/ai-recommendations",
            post(commands::recommendations::recommendations),
        )
        .merge(pages)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Startup summary of what the server checks.
pub fn banner(bind: &str) -> String {
    let health = health_report();
    let mut lines = vec![
        "SEO auditor starting".to_string(),
        format!(
            "Total checks: {} across {} categories",
            health.total_checks,
            health.categories.len()
        ),
    ];
    lines.extend(CategoryKey::ALL.iter().map(|k| {
        format!(
            "  - {}: {} checks",
            k.display_name(),
            health.categories.get(k).copied().unwrap_or_default()
        )
    }));
    lines.push(format!("Listening on http://{bind}"));
    lines.join("\n")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state, &config.cors_origins);

    let listener = TcpListener::bind(config.bind).await?;
    let bound = listener.local_addr()?;
    for line in banner(&bound.to_string()).lines() {
        info!("{}", line);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_lists_every_category() {
        let text = banner("127.0.0.1:5000");
        assert!(text.contains("Total checks: 180 across 9 categories"));
        assert!(text.contains("  - Technical SEO: 35 checks"));
        assert!(text.contains("  - GEO/AEO: 30 checks"));
        assert!(text.ends_with("Listening on http://127.0.0.1:5000"));
    }
}
