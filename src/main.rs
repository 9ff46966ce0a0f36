//! Carbon Intensity API - HTTP service for carbon intensity data by country
//!
//! Proxies a remote static JSON dataset, caches it in memory with a
//! one-hour TTL, and serves it with filtering, searching, sorting, and
//! pagination.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use carbonapi::api::{self, ApiState};
use carbonapi::cache::DatasetCache;
use carbonapi::data::CarbonClient;

/// Carbon Intensity API server
#[derive(Parser, Debug)]
#[command(name = "carbonapi")]
#[command(about = "Carbon intensity API with in-memory caching and query filters")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Override the upstream dataset URL
    #[arg(long, value_name = "URL")]
    source_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let client = match &args.source_url {
        Some(url) => CarbonClient::with_url(url.clone()),
        None => CarbonClient::new(),
    };
    info!(url = client.url(), "using upstream dataset");

    let cache = Arc::new(DatasetCache::new(Arc::new(client)));
    let app = api::create_router(ApiState::new(cache));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "carbon intensity API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
