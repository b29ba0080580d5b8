//! Data tier provider contracts

use std::fmt::{self, Debug, Display};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::geo::GeoPoint;

/// Identifies the origin of a piece of data (a remote tier, the cache, or
/// the terminal fallback).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A remote data tier.
///
/// `timeout` bounds the attempt; implementations should give up within it,
/// but the orchestrator enforces the bound externally regardless.
#[async_trait]
pub trait DataProvider<T>: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch(&self, point: GeoPoint, timeout: Duration) -> Result<T, DomainError>;
}

/// The terminal tier: statically defined data adapted to the query point.
///
/// Infallible and synchronous; it performs no I/O and must complete in
/// effectively zero time.
pub trait StaticSource<T>: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    fn resolve(&self, point: GeoPoint) -> T;
}
