//! Domain layer - core types, traits and errors

pub mod cache;
pub mod clock;
pub mod error;
pub mod geo;
pub mod provider;
pub mod report;
pub mod telemetry;
pub mod tiered;

pub use cache::{CacheEntry, CacheMetadata, KeyValueStore};
pub use clock::{Clock, SystemClock};
pub use error::DomainError;
pub use geo::{GeoBounds, GeoPoint};
pub use provider::{DataProvider, ProviderId, StaticSource};
pub use report::{BurntArea, FireRiskReport, RiskLevel};
pub use telemetry::{NoopTelemetry, RecordingTelemetry, TelemetryEvent, TelemetrySink};
pub use tiered::{Freshness, TieredResult};
