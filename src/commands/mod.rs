//! HTTP handlers and the state they share.

pub mod analysis;
pub mod health;
pub mod pages;
pub mod recommendations;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::{Auditor, PageAuditor, RecommendationClient};

#[derive(Clone)]
pub struct AppState {
    pub auditor: Arc<dyn Auditor>,
    pub recommender: Arc<RecommendationClient>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let fetch = config.fetch_settings();
        Ok(Self {
            auditor: Arc::new(PageAuditor::new(&fetch)?),
            recommender: Arc::new(RecommendationClient::new(&fetch, config.llm_settings())?),
            static_dir: config.static_dir.clone(),
        })
    }
}
