use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::domain::SystemClock;
use crate::infrastructure::logging::{LoggingConfig, init_logging};

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print entry count and access log summary
    Stats,

    /// Delete expired and corrupt entries
    Cleanup,

    /// Drop every cached entry
    Clear,
}

pub async fn run(args: CacheArgs) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    let store = crate::create_store(&config)?;
    let cache = crate::create_cache(store, Arc::new(SystemClock), &config);

    match args.command {
        CacheCommand::Stats => {
            let meta = cache.metadata().await;
            let output = serde_json::json!({
                "total_entries": meta.total_entries,
                "last_cleanup": meta.last_cleanup,
                "keys": meta.access_log.keys().collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        CacheCommand::Cleanup => {
            let removed = cache.cleanup().await;
            println!("removed {} entries", removed);
        }
        CacheCommand::Clear => {
            cache.clear().await;
            println!("cache cleared");
        }
    }

    Ok(())
}
