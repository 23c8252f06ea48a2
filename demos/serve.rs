//! Serve the top stories over HTTP.
//!
//! ```text
//! cargo run --example serve [config.json]
//! RUST_LOG=quiet_hn=debug cargo run --example serve
//! ```
//!
//! The config file is optional JSON in the shape of `quiet_hn::Config`; any
//! field left out keeps its default. `QUIET_HN_CONFIG` may name the file
//! instead of the first argument.

use quiet_hn::{Config, TopStories, api, run_with_shutdown};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quiet_hn=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    config.validate()?;
    let config = Arc::new(config);

    let service = Arc::new(TopStories::new((*config).clone())?);

    // First tick rebuilds immediately, so the snapshot is warm before most requests
    if service.start_refresher() {
        tracing::info!(period_secs = config.cache.ttl.as_secs(), "Snapshot refresher running");
    }

    let server = tokio::spawn(api::start_api_server(service.clone(), config.clone()));

    run_with_shutdown(service).await;
    server.abort();

    Ok(())
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUIET_HN_CONFIG").ok());

    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let config = serde_json::from_str(&raw)?;
            tracing::info!(path = %path, "Loaded configuration");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
