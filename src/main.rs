//! Raid Planner API server
//!
//! Main entry point: parse flags, initialize logging, serve.

use clap::Parser;
use raid_planner::config::{PlannerConfig, TARKOV_API_URL};
use raid_planner::server::ApiServer;
use raid_planner::service::Planner;
use raid_planner::logging;
use std::process;
use std::time::Duration;

/// Caching proxy for the tarkov.dev GraphQL API
#[derive(Parser, Debug)]
#[command(name = "raid-planner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "RAID_PLANNER_BIND", default_value = "0.0.0.0:8000")]
    bind: String,

    /// Upstream GraphQL endpoint
    #[arg(long, env = "RAID_PLANNER_UPSTREAM", default_value = TARKOV_API_URL)]
    upstream: String,

    /// Cache TTL in seconds
    #[arg(long, env = "RAID_PLANNER_CACHE_TTL", default_value_t = 300)]
    cache_ttl: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let config = PlannerConfig {
        endpoint: cli.upstream,
        cache_ttl: Duration::from_secs(cli.cache_ttl),
        ..Default::default()
    };

    let planner = match Planner::new(&config) {
        Ok(planner) => planner,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build planner");
            process::exit(1);
        }
    };

    tracing::info!(
        upstream = %config.endpoint,
        ttl_secs = config.cache_ttl.as_secs(),
        "Starting raid planner"
    );

    if let Err(e) = ApiServer::new(planner).run(&cli.bind).await {
        tracing::error!(error = %e, "Server failed");
        process::exit(1);
    }
}
