use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use inventory_facade::InventoryService;
use inventory_facade::cache::ResponseCache;
use inventory_facade::cache::constants::DEFAULT_TTL_SECS;
use inventory_facade::config::{
    CacheConfig, DEFAULT_UPSTREAM_TIMEOUT_SECS, INVENTORY_ENTITY_TYPE_ID, InventoryConfig,
    UpstreamConfig,
};
use inventory_facade::crm::BitrixClient;
use inventory_facade::server;

/// Read-only HTTP facade over CRM inventory items with short-lived caching
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CRM REST webhook base URL, e.g. https://example.bitrix24.com/rest/1/<token>
    #[arg(long, env = "CRM_WEBHOOK_URL")]
    webhook_url: String,

    /// Address to listen on
    #[arg(long, env = "INVENTORY_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Custom cache directory path (defaults to the platform cache dir)
    #[arg(long, env = "INVENTORY_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Seconds a cached response stays fresh; also advertised as max-age
    #[arg(long, env = "INVENTORY_CACHE_TTL", default_value_t = DEFAULT_TTL_SECS)]
    cache_ttl: u64,

    /// CRM entity type id of inventory items
    #[arg(long, env = "INVENTORY_ENTITY_TYPE_ID", default_value_t = INVENTORY_ENTITY_TYPE_ID)]
    entity_type_id: u32,

    /// Seconds to wait for the CRM before failing a request
    #[arg(long, env = "INVENTORY_UPSTREAM_TIMEOUT", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    upstream_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cache = ResponseCache::new(&CacheConfig {
        dir: args.cache_dir,
        ttl: Duration::from_secs(args.cache_ttl),
    })?;
    tracing::info!(
        "Using cache directory {} (ttl {}s)",
        cache.dir().display(),
        args.cache_ttl
    );

    let client = BitrixClient::new(&UpstreamConfig {
        webhook_url: args.webhook_url,
        timeout: Duration::from_secs(args.upstream_timeout),
    })?;

    let service = InventoryService::new(
        client,
        cache,
        InventoryConfig {
            entity_type_id: args.entity_type_id,
            ..InventoryConfig::default()
        },
    );

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!("Serving inventory on http://{}", listener.local_addr()?);

    server::serve(listener, service, shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
