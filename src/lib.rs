//! Wildfire Data Gateway
//!
//! A tiered fallback gateway for environmental point data with support for:
//! - Remote data tiers bounded by a global deadline budget
//! - A geohash-keyed cache with TTL and LRU eviction
//! - A never-failing terminal tier built from bundled incident data
//! - Telemetry for every tier attempt and fallback decision

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::info;

use config::StoreBackend;
use domain::{BurntArea, Clock, DataProvider, FireRiskReport, GeoBounds, KeyValueStore, SystemClock};
use infrastructure::cache::{GeoCacheConfig, GeospatialCache};
use infrastructure::orchestrator::{FallbackOrchestrator, OrchestratorConfig};
use infrastructure::provider::{HttpJsonProvider, HttpProviderConfig, StaticBundleSource};
use infrastructure::store::{FileStore, InMemoryStore};
use infrastructure::telemetry::TracingTelemetry;

/// Builds the fully wired orchestrator from configuration.
pub async fn create_gateway(
    config: &AppConfig,
) -> anyhow::Result<FallbackOrchestrator<FireRiskReport>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = create_store(config)?;
    let cache = Arc::new(create_cache(store, clock.clone(), config));

    let primary: Arc<dyn DataProvider<FireRiskReport>> =
        Arc::new(HttpJsonProvider::new(HttpProviderConfig::new(
            &config.providers.primary.name,
            &config.providers.primary.base_url,
        ))?);

    let terminal = Arc::new(StaticBundleSource::new(clock.clone(), default_burnt_areas()));

    let mut orchestrator = FallbackOrchestrator::new(primary, cache, terminal)
        .with_clock(clock)
        .with_telemetry(Arc::new(TracingTelemetry))
        .with_config(OrchestratorConfig {
            deadline: Duration::from_millis(config.orchestrator.deadline_ms),
            tier_timeout: Duration::from_millis(config.orchestrator.tier_timeout_ms),
            terminal_allowance: Duration::from_millis(config.orchestrator.terminal_allowance_ms),
        });

    if let Some(regional) = &config.providers.regional {
        let bounds = GeoBounds::new(
            regional.bounds.lat_min,
            regional.bounds.lat_max,
            regional.bounds.lon_min,
            regional.bounds.lon_max,
        )?;
        let provider: Arc<dyn DataProvider<FireRiskReport>> = Arc::new(HttpJsonProvider::new(
            HttpProviderConfig::new(&regional.name, &regional.base_url),
        )?);

        info!(provider = %regional.name, "regional tier enabled");
        orchestrator = orchestrator.with_regional(provider, bounds);
    }

    Ok(orchestrator)
}

/// Builds the cache substrate selected by configuration.
pub fn create_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory cache store");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::File => {
            info!(path = %config.store.path, "Using file cache store");
            Arc::new(FileStore::open(&config.store.path)?)
        }
    };

    Ok(store)
}

/// Builds the geospatial cache over a substrate.
pub fn create_cache(
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: &AppConfig,
) -> GeospatialCache {
    GeospatialCache::with_config(
        store,
        clock,
        GeoCacheConfig::default()
            .with_ttl(Duration::from_secs(config.cache.ttl_secs))
            .with_max_entries(config.cache.max_entries)
            .with_precision(config.cache.precision),
    )
}

// ============================================================================
// Default Entities
// ============================================================================

/// Bundled burnt-area incidents for the terminal tier: a snapshot of
/// notable UK and Ireland moorland fires.
fn default_burnt_areas() -> Vec<BurntArea> {
    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        Some(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    vec![
        BurntArea {
            id: "ba-saddleworth".to_string(),
            lat: 53.536,
            lon: -1.988,
            area_hectares: 980.0,
            fire_date: date(2025, 4, 18),
            season_year: 2025,
        },
        BurntArea {
            id: "ba-marsden".to_string(),
            lat: 53.602,
            lon: -1.931,
            area_hectares: 420.0,
            fire_date: date(2025, 3, 30),
            season_year: 2025,
        },
        BurntArea {
            id: "ba-cannich".to_string(),
            lat: 57.334,
            lon: -4.837,
            area_hectares: 1260.0,
            fire_date: date(2024, 5, 28),
            season_year: 2024,
        },
        BurntArea {
            id: "ba-mourne".to_string(),
            lat: 54.18,
            lon: -6.03,
            area_hectares: 350.0,
            fire_date: date(2024, 4, 23),
            season_year: 2024,
        },
        BurntArea {
            id: "ba-dartmoor".to_string(),
            lat: 50.577,
            lon: -3.92,
            area_hectares: 210.0,
            fire_date: date(2025, 5, 7),
            season_year: 2025,
        },
        BurntArea {
            id: "ba-glen-etive".to_string(),
            lat: 56.61,
            lon: -4.92,
            area_hectares: 640.0,
            fire_date: date(2024, 6, 11),
            season_year: 2024,
        },
        BurntArea {
            id: "ba-winter-hill".to_string(),
            lat: 53.625,
            lon: -2.522,
            area_hectares: 760.0,
            fire_date: date(2025, 4, 2),
            season_year: 2025,
        },
        BurntArea {
            id: "ba-wicklow".to_string(),
            lat: 52.98,
            lon: -6.39,
            area_hectares: 300.0,
            fire_date: date(2025, 3, 21),
            season_year: 2025,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::GeoPoint;
    use domain::StaticSource;

    #[test]
    fn test_default_bundle_is_well_formed() {
        let areas = default_burnt_areas();

        assert!(!areas.is_empty());
        for area in &areas {
            assert!(GeoPoint::new(area.lat, area.lon).is_ok(), "{}", area.id);
            assert!(area.area_hectares > 0.0);
        }
    }

    #[tokio::test]
    async fn test_create_gateway_from_default_config() {
        let gateway = create_gateway(&AppConfig::default()).await.unwrap();

        // The terminal tier alone must produce a usable report
        let report = StaticBundleSource::new(Arc::new(SystemClock), default_burnt_areas())
            .resolve(GeoPoint::new(53.54, -2.0).unwrap());
        assert!(!report.incidents.is_empty());

        drop(gateway);
    }

    #[tokio::test]
    async fn test_create_store_memory_backend() {
        let store = create_store(&AppConfig::default()).unwrap();
        assert!(store.write("geo:entry:gcvwr", "{}").await);
    }
}
