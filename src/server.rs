//! HTTP server initialization.
//!
//! Wires the database, assistant provider, and config into the axum router
//! and serves until ctrl-c.

use anyhow::Result;
use std::sync::{Arc, Mutex};

use crate::api::{self, AppState};
use crate::assistant;
use crate::config::AomigoConfig;
use crate::db;

/// Shared setup: open DB, create the assistant provider, check the ladder.
/// Returns the application state with everything wrapped for sharing.
fn setup_shared_state(config: AomigoConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    // Warn when stored schedules were computed against a different ladder
    if let Ok(Some(stored_ladder)) = db::migrations::get_review_ladder(&conn) {
        let configured = config
            .review
            .intervals
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if stored_ladder != configured {
            tracing::warn!(
                stored = %stored_ladder,
                configured = %configured,
                "review ladder changed — existing schedules keep their old spacing"
            );
        }
    }

    let db = Arc::new(Mutex::new(conn));

    let provider = assistant::create_provider(&config.assistant)?;
    let assistant: Arc<dyn assistant::AssistantProvider> = Arc::from(provider);
    tracing::info!(provider = %config.assistant.provider, "assistant provider ready");

    Ok(AppState {
        db,
        assistant,
        config: Arc::new(config),
    })
}

/// Start the API server.
pub async fn serve(config: AomigoConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting AOMIGO API server");

    let state = setup_shared_state(config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "API listening at http://{bind_addr}/api/v1");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down API server");
        })
        .await?;

    Ok(())
}
