//! Logfunnel signed-request log ingestion service.
//!
//! Main entry point: initializes tracing, loads configuration, constructs
//! the sink client, and serves the collector until shutdown.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use logfunnel_api::{start_server, AppState, Config};
use logfunnel_core::RealClock;
use logfunnel_sink::HttpSink;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting logfunnel collector");

    let config = Config::load()?;
    info!(
        server_addr = %format!("{}:{}", config.hostname, config.port),
        sink_base_url = %config.sink_base_url,
        consumer_secret = config.consumer_secret_masked(),
        "Configuration loaded"
    );

    if config.consumer_secret.is_empty() {
        warn!("Signing secret is unset; every request will be rejected until CONSUMER_SECRET is configured");
    }

    let sink = HttpSink::new(config.to_sink_config())
        .context("Failed to construct sink client")?;

    let state = AppState::new(
        Arc::new(sink),
        Arc::new(RealClock::new()),
        config.consumer_secret.clone(),
    );

    let addr = config.parse_server_addr()?;
    start_server(state, addr, Duration::from_secs(config.request_timeout))
        .await
        .context("Server failed")?;

    info!("Logfunnel shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,logfunnel=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
