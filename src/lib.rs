//! Jira Scraper - GraphQL gateway over the Jira and Stash REST APIs.
//!
//! Exposes issues, comments, linked commits, repositories and pull requests
//! from both upstreams through one typed query surface, and serves the
//! React frontend bundle alongside it.

pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod scalars;
pub mod server;
pub mod services;

use tokio_util::sync::CancellationToken;

pub use config::Config;
pub use error::AppError;
pub use graphql::{build_schema, schema_from_config, ScraperSchema};

/// Build the schema from `config` and serve it until Ctrl-C.
pub async fn run(config: Config) -> Result<(), AppError> {
    let schema = schema_from_config(&config)?;

    let shutdown = CancellationToken::new();
    let shutdown_trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("[server] Shutdown requested");
                shutdown_trigger.cancel();
            }
            Err(e) => log::error!("[server] Failed to listen for Ctrl-C: {}", e),
        }
    });

    server::serve(&config, schema, shutdown).await
}
