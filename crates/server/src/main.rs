mod api;
mod bootstrap;
mod health;
mod ui;

use std::time::Duration;

use anyhow::Result;
use axum::Router;
use shelf_core::config::{AppConfig, LoadOptions};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

fn init_logging(config: &AppConfig) {
    use shelf_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config);
    let router = build_router(&app);

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        bind_address = %address,
        seeded = app.config.catalog.seed_demo_data,
        "shelf-server listening"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    tokio::select! {
        result = axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()) => {
            result?;
        }
        () = forced_shutdown(grace) => {
            warn!(
                event_name = "system.server.forced_stop",
                "graceful shutdown window elapsed before connections drained"
            );
        }
    }

    info!(event_name = "system.server.stopped", "shelf-server stopped");
    Ok(())
}

fn build_router(app: &bootstrap::Application) -> Router {
    ui::router(app.config.server.public_base_url.clone())
        .merge(api::router(app.catalog.clone()))
        .merge(health::router(app.catalog.clone()))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "failed to listen for shutdown signal");
        return;
    }
    info!(event_name = "system.server.stopping", "shutdown signal received");
}

async fn forced_shutdown(grace: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(grace).await;
}
