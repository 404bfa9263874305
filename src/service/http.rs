use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::{FetchSettings, PRIMARY_USER_AGENT, PROBE_USER_AGENT};

#[derive(Debug, Clone, Copy)]
pub enum ClientType {
    /// The audited page. Long timeout, browser-like agent.
    Primary,
    /// robots.txt / sitemap.xml / llms.txt. Short timeout.
    Probe,
    /// Text-generation service.
    Llm,
}

/// Factory for the HTTP client used by each class of outbound request.
pub fn create_client(client_type: ClientType, settings: &FetchSettings) -> Result<Client> {
    let builder = Client::builder();

    match client_type {
        ClientType::Primary => builder
            .timeout(settings.fetch_timeout)
            .user_agent(PRIMARY_USER_AGENT)
            .build()
            .context("Failed to build primary fetch client"),
        ClientType::Probe => builder
            .timeout(settings.probe_timeout)
            .user_agent(PROBE_USER_AGENT)
            .build()
            .context("Failed to build probe client"),
        ClientType::Llm => builder
            .timeout(settings.llm_timeout)
            .build()
            .context("Failed to build LLM client"),
    }
}
