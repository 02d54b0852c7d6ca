//! # backsyncd — backsync daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Open one table-backed model source per configured resource
//! - Construct dispatch services, injecting sources via port traits
//! - Build the axum router, mount resources, bind, serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no dispatch logic belongs here.

mod config;

use backsync_adapter_http_axum::{api, router};
use backsync_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteResource};
use backsync_app::services::crud_service::CrudService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Resources
    let mut resources = Vec::with_capacity(config.resources.len());
    for resource in &config.resources {
        let source = SqliteResource::open(pool.clone(), resource.table()).await?;
        let service = CrudService::new(source).with_update_id_source(resource.update_id.into());
        resources.push((resource.collection.clone(), api::routes(service)));
        tracing::info!(
            collection = %resource.collection,
            table = %resource.table(),
            "mounted resource"
        );
    }

    // HTTP
    let app = router::build(resources);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "backsyncd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
