use crate::config::ScribeConfig;
use crate::http::{create_router, AppState};
use scribe_core::{Scribe, ScribeOptions};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn run(config: ScribeConfig) -> anyhow::Result<()> {
    let errors = config.validate();
    if !errors.is_empty() {
        anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    config.ensure_data_dir()?;

    info!("Starting scribe server v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP: {}", config.server.http_addr);
    info!("Data: {:?}", config.server.data_dir);

    info!("Opening database...");
    let scribe = Scribe::open(
        config.db_path(),
        ScribeOptions {
            context_window_minutes: config.context.window_minutes,
        },
    )?;
    let stats = scribe.stats()?;
    info!(
        "Database loaded: {} sessions, {} transcript messages, {} chat messages",
        stats.session_count, stats.message_count, stats.chat_count
    );

    let state = AppState {
        scribe: Arc::new(scribe),
        start_time: std::time::Instant::now(),
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.server.http_addr).await?;
    info!("HTTP server listening on {}", config.server.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
