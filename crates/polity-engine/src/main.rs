//! Political simulation engine binary.
//!
//! Wires together persistence, the advisor transport, the HTTP surface,
//! and the scheduled-tick loop, then runs until killed.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `polity-config.yaml`
//! 3. Connect to storage (`Postgres` if `database.url` is set, else in-memory)
//! 4. Construct the advisor backend
//! 5. Assemble shared application state
//! 6. Spawn the tick scheduler
//! 7. Serve the HTTP surface until the process is killed

mod config;
mod error;
mod scheduler;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use polity_advisors::{create_backend, LlmConfig};
use polity_db::{InMemoryStore, PostgresConfig, PostgresStore, WorldStore};
use polity_server::router::build_router;
use polity_server::server::{start_server, ServerConfig};
use polity_server::state::{AppState, ServerRuntimeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::error::EngineError;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("polity-engine starting");

    // 2. Load configuration.
    let config = EngineConfig::load(Path::new("polity-config.yaml"))?;
    info!(
        host = config.server.host,
        port = config.server.port,
        tick_interval_hours = config.game.tick_interval_hours,
        max_players_per_server = config.game.max_players_per_server,
        max_catchup_ticks = config.game.max_catchup_ticks,
        "configuration loaded"
    );

    // 3. Connect to storage.
    let store = if config.database.url.trim().is_empty() {
        info!("database.url not set, using in-memory store");
        WorldStore::InMemory(InMemoryStore::new())
    } else {
        let pg_config = PostgresConfig::new(&config.database.url);
        let pg = PostgresStore::connect(&pg_config).await?;
        info!("connected to PostgreSQL");
        WorldStore::Postgres(pg)
    };

    // 4. Construct the advisor backend.
    let llm_config = LlmConfig {
        backend: config.advisor.backend,
        api_url: config.advisor.api_url.clone(),
        api_key: config.advisor.api_key.clone(),
        model: config.advisor.model.clone(),
    };
    let backend = create_backend(&llm_config)?;
    info!(backend = backend.name(), "advisor backend ready");
    let stage_timeout = Duration::from_secs(config.advisor.stage_timeout_secs);

    // 5. Assemble shared application state.
    let runtime_config = ServerRuntimeConfig {
        max_players_per_server: config.game.max_players_per_server,
        tick_interval_hours: config.game.tick_interval_hours,
    };
    let app_state = AppState::new(Arc::new(store), runtime_config);

    // 6. Spawn the tick scheduler.
    let poll_interval = Duration::from_secs(config.game.poll_interval_secs);
    let max_catchup_ticks = config.game.max_catchup_ticks;
    let scheduler_state = app_state.clone();
    tokio::spawn(async move {
        scheduler::run(scheduler_state, backend, stage_timeout, poll_interval, max_catchup_ticks).await;
    });
    info!(poll_interval_secs = config.game.poll_interval_secs, "tick scheduler running");

    // 7. Serve the HTTP surface until killed.
    let router = build_router(app_state);
    let server_config = ServerConfig { host: config.server.host.clone(), port: config.server.port };
    start_server(server_config, router).await?;

    Ok(())
}
