//! Server configuration: command-line flags with environment fallbacks.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LLM_URL: &str = "https://api.databi.io/api";
pub const DEFAULT_LLM_MODEL: &str = "llama3.1:latest";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://ai1stseo.com",
    "https://www.ai1stseo.com",
    "http://localhost:5000",
    "http://127.0.0.1:5000",
];

/// Browser-like agent for the audited page itself.
pub const PRIMARY_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
/// Minimal agent for robots/sitemap/llms probes.
pub const PROBE_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, Parser)]
#[command(name = "seo-auditor", version, about = "Single-page SEO/AEO audit server")]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    #[arg(long, env = "SEO_AUDITOR_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Directory holding index.html, analyze.html, audit.html and assets/.
    #[arg(long, env = "SEO_AUDITOR_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Base URL of the text-generation service; `/generate` is appended.
    #[arg(long, env = "SEO_AUDITOR_LLM_URL", default_value = DEFAULT_LLM_URL)]
    pub llm_url: String,

    #[arg(long, env = "SEO_AUDITOR_LLM_MODEL", default_value = DEFAULT_LLM_MODEL)]
    pub llm_model: String,

    /// Allowed CORS origin. Repeat the flag, or give a comma list in the env var.
    #[arg(
        long = "cors-origin",
        env = "SEO_AUDITOR_CORS_ORIGINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    )]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "SEO_AUDITOR_FETCH_TIMEOUT", default_value_t = 15)]
    pub fetch_timeout_secs: u64,

    #[arg(long, env = "SEO_AUDITOR_PROBE_TIMEOUT", default_value_t = 5)]
    pub probe_timeout_secs: u64,

    #[arg(long, env = "SEO_AUDITOR_LLM_TIMEOUT", default_value_t = 120)]
    pub llm_timeout_secs: u64,
}

impl ServerConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            llm_timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.llm_url.trim_end_matches('/').to_string(),
            model: self.llm_model.clone(),
        }
    }
}

/// Timeouts for each class of outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub fetch_timeout: Duration,
    pub probe_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(5),
            llm_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }
}
