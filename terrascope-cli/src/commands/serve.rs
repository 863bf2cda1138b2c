//! Serve command - run the HTTP service until Ctrl+C.

use std::net::SocketAddr;

use console::style;
use terrascope::app::TerrascopeApp;
use terrascope::config::format_size;
use tracing::warn;

use super::load_app_config;
use crate::error::CliError;

/// Run the serve command.
pub async fn run(bind: Option<SocketAddr>) -> Result<(), CliError> {
    let (file, mut config) = load_app_config()?;
    if let Some(bind) = bind {
        config = config.with_bind(bind);
    }

    println!("{}", style(format!("Terrascope v{}", terrascope::VERSION)).bold());
    println!("==================");
    println!();
    println!("Listen:     http://{}", config.bind);
    println!(
        "Cache:      {} memory, {}h TTL, sweep every {}s",
        format_size(config.cache.max_size_bytes),
        file.cache.ttl_hours,
        config.cache.sweep_interval.as_secs()
    );
    if config.sentinel_hub.credentials.is_some() {
        println!("Imagery:    Sentinel Hub credentials configured");
    } else {
        println!(
            "Imagery:    {}",
            style("Sentinel Hub credentials NOT configured").yellow()
        );
        println!("            Set sentinel_hub.client_id and client_secret, or the");
        println!("            SENTINEL_HUB_CLIENT_ID / SENTINEL_HUB_CLIENT_SECRET variables.");
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let app = TerrascopeApp::start(config).await?;
    let result = app.serve(shutdown_signal()).await;

    println!();
    let stats = app.orchestrator().stats();
    println!("Session Summary");
    println!("───────────────");
    println!(
        "  Requests:       {} ({} hits, {} misses)",
        stats.requests, stats.cache_hits, stats.cache_misses
    );
    println!(
        "  Provider calls: {} ({} coalesced waits)",
        stats.provider_calls, stats.coalesced
    );
    println!("  Failures:       {}", stats.failures);

    app.shutdown().await;
    result.map_err(CliError::from)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; shutting down");
    }
    println!();
    println!("Received shutdown signal, stopping...");
}
