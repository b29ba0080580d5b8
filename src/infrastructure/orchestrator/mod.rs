//! Tiered fallback orchestrator
//!
//! Attempts data tiers in a fixed priority order under a global deadline:
//! primary remote, regional remote (when the query point lies inside the
//! configured region), the geospatial cache, then a terminal static source
//! that cannot fail. The first success wins; every failure only deepens
//! the fallback, so callers always receive data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::geo::{GeoBounds, GeoPoint};
use crate::domain::{
    Clock, DataProvider, Freshness, NoopTelemetry, ProviderId, StaticSource, SystemClock,
    TelemetryEvent, TelemetrySink, TieredResult,
};
use crate::infrastructure::cache::GeospatialCache;

/// Timing knobs for a tiered fetch.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Wall-clock budget for the whole call.
    pub deadline: Duration,
    /// Upper bound for any single remote attempt.
    pub tier_timeout: Duration,
    /// Slice of the budget reserved for the cache lookup and terminal
    /// tier; remote tiers never eat into it.
    pub terminal_allowance: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(8),
            tier_timeout: Duration::from_secs(3),
            terminal_allowance: Duration::from_millis(250),
        }
    }
}

/// A remote tier gated by a geographic eligibility predicate.
#[derive(Debug)]
struct RegionalTier<T> {
    provider: Arc<dyn DataProvider<T>>,
    region: GeoBounds,
}

/// Orchestrates the fallback chain. Holds no per-call state, so a single
/// instance serves concurrent callers; the shared cache is injected and
/// outlives it.
#[derive(Debug)]
pub struct FallbackOrchestrator<T> {
    primary: Arc<dyn DataProvider<T>>,
    regional: Option<RegionalTier<T>>,
    cache: Arc<GeospatialCache>,
    terminal: Arc<dyn StaticSource<T>>,
    telemetry: Arc<dyn TelemetrySink>,
    clock: Arc<dyn Clock>,
    config: OrchestratorConfig,
}

impl<T> FallbackOrchestrator<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        primary: Arc<dyn DataProvider<T>>,
        cache: Arc<GeospatialCache>,
        terminal: Arc<dyn StaticSource<T>>,
    ) -> Self {
        Self {
            primary,
            regional: None,
            cache,
            terminal,
            telemetry: Arc::new(NoopTelemetry),
            clock: Arc::new(SystemClock),
            config: OrchestratorConfig::default(),
        }
    }

    /// Adds the regional tier, attempted only for points inside `region`.
    pub fn with_regional(mut self, provider: Arc<dyn DataProvider<T>>, region: GeoBounds) -> Self {
        self.regional = Some(RegionalTier { provider, region });
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetches data for `point` under the configured deadline.
    ///
    /// Always returns `Success`; at worst the data is the terminal tier's
    /// fallback, tagged accordingly.
    pub async fn fetch(&self, point: GeoPoint) -> TieredResult<T> {
        self.fetch_with_deadline(point, self.config.deadline).await
    }

    /// Fetches data for `point` under an explicit deadline.
    pub async fn fetch_with_deadline(&self, point: GeoPoint, deadline: Duration) -> TieredResult<T> {
        let started = Instant::now();
        let mut depth = 0usize;

        let mut remotes: Vec<&Arc<dyn DataProvider<T>>> = vec![&self.primary];
        match &self.regional {
            Some(tier) if tier.region.contains(&point) => remotes.push(&tier.provider),
            Some(tier) => {
                // Skipped entirely: not a failed attempt, no telemetry.
                debug!(provider = %tier.provider.id(), "query point outside region; skipping regional tier");
            }
            None => {}
        }

        for provider in remotes {
            let Some(attempt_timeout) = self.remote_budget(started, deadline) else {
                debug!("deadline budget exhausted; skipping remaining remote tiers");
                break;
            };

            match self.attempt_remote(provider.as_ref(), point, attempt_timeout).await {
                Some(data) => {
                    self.write_back(&point, &data).await;
                    return self.complete(data, provider.id(), Freshness::Live, started);
                }
                None => {
                    depth += 1;
                    self.telemetry.record(TelemetryEvent::FallbackDepth {
                        depth,
                        at: self.clock.now(),
                    });
                }
            }
        }

        let cache_id = ProviderId::from("cache");
        self.telemetry.record(TelemetryEvent::AttemptStart {
            provider: cache_id.clone(),
            at: self.clock.now(),
        });
        let lookup_started = Instant::now();
        let hit: Option<T> = self.cache.get_at(&point).await;
        self.telemetry.record(TelemetryEvent::AttemptEnd {
            provider: cache_id.clone(),
            elapsed: lookup_started.elapsed(),
            success: hit.is_some(),
        });

        if let Some(data) = hit {
            return self.complete(data, cache_id, Freshness::Cached, started);
        }

        depth += 1;
        self.telemetry.record(TelemetryEvent::FallbackDepth {
            depth,
            at: self.clock.now(),
        });

        let terminal_id = self.terminal.id();
        self.telemetry.record(TelemetryEvent::AttemptStart {
            provider: terminal_id.clone(),
            at: self.clock.now(),
        });
        let resolve_started = Instant::now();
        let data = self.terminal.resolve(point);
        self.telemetry.record(TelemetryEvent::AttemptEnd {
            provider: terminal_id.clone(),
            elapsed: resolve_started.elapsed(),
            success: true,
        });

        self.complete(data, terminal_id, Freshness::Fallback, started)
    }

    /// Budget for the next remote attempt, or `None` when the remaining
    /// deadline (minus the terminal allowance) is spent.
    fn remote_budget(&self, started: Instant, deadline: Duration) -> Option<Duration> {
        let remaining = deadline
            .checked_sub(started.elapsed())?
            .checked_sub(self.config.terminal_allowance)?;

        if remaining.is_zero() {
            None
        } else {
            Some(remaining.min(self.config.tier_timeout))
        }
    }

    /// Runs one remote tier; timeouts are treated exactly like failures.
    /// There is no downstream cancellation: an abandoned in-flight request
    /// may still complete and is discarded.
    async fn attempt_remote(
        &self,
        provider: &dyn DataProvider<T>,
        point: GeoPoint,
        attempt_timeout: Duration,
    ) -> Option<T> {
        let id = provider.id();
        self.telemetry.record(TelemetryEvent::AttemptStart {
            provider: id.clone(),
            at: self.clock.now(),
        });

        let attempt_started = Instant::now();
        let outcome = tokio::time::timeout(attempt_timeout, provider.fetch(point, attempt_timeout)).await;
        let elapsed = attempt_started.elapsed();

        let data = match outcome {
            Ok(Ok(data)) => Some(data),
            Ok(Err(error)) => {
                warn!(provider = %id, %error, "tier attempt failed");
                None
            }
            Err(_) => {
                debug!(provider = %id, timeout_ms = attempt_timeout.as_millis() as u64, "tier attempt timed out");
                None
            }
        };

        self.telemetry.record(TelemetryEvent::AttemptEnd {
            provider: id,
            elapsed,
            success: data.is_some(),
        });
        data
    }

    /// Best-effort cache write-back; a storage failure never fails the call.
    async fn write_back(&self, point: &GeoPoint, data: &T) {
        if let Err(error) = self.cache.set(point, data).await {
            warn!(%error, "cache write-back failed");
        }
    }

    fn complete(
        &self,
        data: T,
        source: ProviderId,
        freshness: Freshness,
        started: Instant,
    ) -> TieredResult<T> {
        self.telemetry.record(TelemetryEvent::Complete {
            provider: source.clone(),
            total_elapsed: started.elapsed(),
        });
        TieredResult::success(data, source, freshness)
    }
}
