//! CLI for the wildfire data gateway
//!
//! Subcommands:
//! - `fetch`: run one tiered lookup for a coordinate
//! - `cache`: inspect or clean the local geospatial cache

pub mod cache;
pub mod fetch;

use clap::{Parser, Subcommand};

/// Wildfire data gateway - tiered fallback fetcher with geospatial caching
#[derive(Parser)]
#[command(name = "wildfire-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a risk report for a coordinate
    Fetch(fetch::FetchArgs),

    /// Inspect or clean the local cache
    Cache(cache::CacheArgs),
}
