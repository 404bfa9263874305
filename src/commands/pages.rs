//! Static front-end pages. Every unknown GET falls back to `index.html`.

use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

pub fn router<S>(static_dir: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let index = static_dir.join("index.html");
    let audit = static_dir.join("audit.html");

    Router::new()
        .route_service("/", ServeFile::new(&index))
        .route_service("/analyze", ServeFile::new(static_dir.join("analyze.html")))
        .route_service("/audit", ServeFile::new(&audit))
        .route_service("/audit/", ServeFile::new(&audit))
        .route_service("/audit/*rest", ServeFile::new(&audit))
        .nest_service("/assets", ServeDir::new(static_dir.join("assets")))
        .fallback_service(ServeFile::new(index))
}
