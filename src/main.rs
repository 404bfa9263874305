// src/main.rs

use clap::Parser;

use seo_auditor::config::ServerConfig;
use seo_auditor::lifecycle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    lifecycle::init_logging();
    lifecycle::serve(config).await
}
