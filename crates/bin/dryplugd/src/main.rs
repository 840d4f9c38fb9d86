//! # dryplugd: dryplug daemon
//!
//! Composition root that wires all adapters together and starts the control
//! loops and the HTTP server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Initialise the `SQLite` connection pool and run migrations
//! - Register every controller in the virtual environment and spawn its
//!   control loop
//! - Build the axum router (snapshots, auto-control, reading feeds), bind to
//!   a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dryplug_adapter_http_axum::router;
use dryplug_adapter_http_axum::state::AppState;
use dryplug_adapter_storage_sqlite_sqlx::SqliteEngineStateStore;
use dryplug_adapter_virtual::VirtualEnvironment;
use dryplug_app::ports::SystemClock;
use dryplug_app::supervisor::ControllerSupervisor;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let controllers = config.controller_configs()?;

    // Database
    let db = dryplug_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to initialise database")?;
    let store = Arc::new(SqliteEngineStateStore::new(db.pool().clone()));

    // Environment
    let environment = Arc::new(VirtualEnvironment::default());
    for controller in &controllers {
        environment.register_controller(controller);
    }

    // Control loops
    let supervisor = Arc::new(ControllerSupervisor::new(
        Arc::clone(&environment),
        Arc::clone(&environment),
        store,
        Arc::new(SystemClock),
        config.poll_interval(),
    ));
    for controller in controllers {
        supervisor.spawn(controller).await?;
    }

    // HTTP
    let app = router::build(AppState::new(Arc::clone(&supervisor), environment));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "dryplugd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    supervisor.shutdown().await;
    tracing::info!("dryplugd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
