use std::time::Duration;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{GeoPoint, TieredResult};
use crate::infrastructure::logging::{LoggingConfig, init_logging};

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Latitude of the query point
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the query point
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,

    /// Overall deadline in milliseconds (overrides configuration)
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

pub async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    let point = GeoPoint::new(args.lat, args.lon)?;
    let orchestrator = crate::create_gateway(&config).await?;

    let result = match args.deadline_ms {
        Some(ms) => {
            orchestrator
                .fetch_with_deadline(point, Duration::from_millis(ms))
                .await
        }
        None => orchestrator.fetch(point).await,
    };

    match result {
        TieredResult::Success {
            data,
            source,
            freshness,
        } => {
            let output = serde_json::json!({
                "source": source.as_str(),
                "freshness": freshness.as_str(),
                "report": data,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        TieredResult::Failure { reason } => {
            // Unreachable by construction; the terminal tier cannot fail.
            anyhow::bail!("fetch failed: {}", reason)
        }
    }
}
