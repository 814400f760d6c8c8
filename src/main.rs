//! About-Me Agent - HTTP Server Entry Point
//!
//! Loads the document corpus, then starts the HTTP server that exposes the
//! chat API.

use aboutme_agent::{agent::Agent, api, config::Config, corpus::DocumentCorpus};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aboutme_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing required variables abort startup.
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, persona={}",
        config.chat_model, config.persona_name
    );

    // Load the document corpus; a missing directory or corrupt document
    // aborts startup.
    let corpus = DocumentCorpus::load(&config.docs_dir)?;
    info!(
        "Loaded {} document(s) from {}",
        corpus.len(),
        config.docs_dir.display()
    );

    let agent = Agent::new(config.clone(), corpus);

    api::serve(&config, agent).await?;

    Ok(())
}
