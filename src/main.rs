//! Bloglist server entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│  Store   │───▶│ AppState │───▶│  Router  │
//! │  (YAML)  │    │ (PG/mem) │    │          │    │  (axum)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Usage: `bloglist [--env <name>] [--port <port>]`

use std::sync::Arc;

use anyhow::Context;
use bloglist::config::AppConfig;
use bloglist::db::Database;
use bloglist::gateway::{self, state::AppState};
use bloglist::store::{MemoryStore, PgStore, Repository};
use bloglist::user_auth::TokenService;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        config.server.port = port;
    }
    let _log_guard = bloglist::logging::init_logging(&config);

    tracing::info!("Starting bloglist in {} mode", env);

    let ttl = config.token_ttl()?;
    let tokens = TokenService::new(config.token_secret()?, ttl);
    if ttl.is_none() {
        tracing::warn!("Issued tokens never expire (auth.token_ttl_secs not set)");
    }

    // Connect on start, close after the server drains
    let (repo, database): (Arc<dyn Repository>, Option<Database>) = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.ensure_schema()
                .await
                .context("Failed to create database schema")?;
            let repo: Arc<dyn Repository> = Arc::new(PgStore::new(db.pool().clone()));
            (repo, Some(db))
        }
        None => {
            tracing::warn!("No database_url configured, using in-memory store");
            let repo: Arc<dyn Repository> = Arc::new(MemoryStore::new());
            (repo, None)
        }
    };

    let state = Arc::new(AppState::new(repo, tokens));
    let result = gateway::run_server(&config.server, state, gateway::shutdown_signal()).await;

    if let Some(db) = database {
        db.close().await;
    }
    result
}
