//! Terminal result of a tiered fetch

use crate::domain::DomainError;
use crate::domain::provider::ProviderId;

/// How fresh the returned data is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched from a remote tier during this call.
    Live,
    /// Served from the geospatial cache.
    Cached,
    /// Produced by the terminal static tier.
    Fallback,
}

/// Outcome of one orchestrated fetch, tagged with provenance.
///
/// The orchestrator's public `fetch` always returns `Success` (the terminal
/// tier cannot fail); `Failure` exists for callers that drive individual
/// tiers directly.
#[derive(Debug)]
pub enum TieredResult<T> {
    Success {
        data: T,
        source: ProviderId,
        freshness: Freshness,
    },
    Failure {
        reason: DomainError,
    },
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Cached => "cached",
            Self::Fallback => "fallback",
        }
    }
}

impl<T> TieredResult<T> {
    pub fn success(data: T, source: ProviderId, freshness: Freshness) -> Self {
        Self::Success {
            data,
            source,
            freshness,
        }
    }

    pub fn failure(reason: DomainError) -> Self {
        Self::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn source(&self) -> Option<&ProviderId> {
        match self {
            Self::Success { source, .. } => Some(source),
            Self::Failure { .. } => None,
        }
    }

    pub fn freshness(&self) -> Option<Freshness> {
        match self {
            Self::Success { freshness, .. } => Some(*freshness),
            Self::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let result = TieredResult::success(7u32, ProviderId::from("effis"), Freshness::Live);

        assert!(result.is_success());
        assert_eq!(result.data(), Some(&7));
        assert_eq!(result.source(), Some(&ProviderId::from("effis")));
        assert_eq!(result.freshness(), Some(Freshness::Live));
        assert_eq!(result.into_data(), Some(7));
    }

    #[test]
    fn test_failure_accessors() {
        let result: TieredResult<u32> =
            TieredResult::failure(DomainError::provider("effis", "unavailable"));

        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert!(result.source().is_none());
        assert!(result.freshness().is_none());
        assert!(result.into_data().is_none());
    }
}
