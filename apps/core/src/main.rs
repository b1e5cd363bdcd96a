// CyberGuard Backend Entry Point
// Wires the knowledge base, database and orchestrator to the HTTP boundary.

use anyhow::Context;
use tracing::{error, info};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use cyberguard_core::agent::{EngineSettings, OrchestratorHandle};
use cyberguard_core::config::Config;
use cyberguard_core::database;
use cyberguard_core::http::{router, AppState};
use cyberguard_core::knowledge::KnowledgeBase;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;

    let config = Config::from_env().context("Failed to read configuration")?;
    info!("Starting CyberGuard on {}", config.bind_addr);

    // The knowledge base is load-or-die: no partial index, no degraded start.
    let kb = KnowledgeBase::load(&config.kb_path)
        .with_context(|| format!("Failed to load knowledge base from {}", config.kb_path.display()))?;

    // A broken conversation log must not prevent the assistant from answering.
    let pool = match database::init_db(&config.db_path).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            error!("Failed to initialize database, continuing without logging: {}", e);
            None
        }
    };

    let settings = EngineSettings {
        min_confidence: config.min_confidence,
        max_suggestions: config.max_suggestions,
    };
    let orchestrator = OrchestratorHandle::new_with_pool(
        kb,
        Some(config.kb_path.clone()),
        pool.clone(),
        settings,
    );

    let app = router(AppState { orchestrator, pool });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new("cyberguard".into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
