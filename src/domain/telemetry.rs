//! Telemetry events emitted by the orchestrator

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::provider::ProviderId;

/// One observation from a tiered fetch. Immutable; consumed by a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    AttemptStart {
        provider: ProviderId,
        at: DateTime<Utc>,
    },
    AttemptEnd {
        provider: ProviderId,
        elapsed: Duration,
        success: bool,
    },
    FallbackDepth {
        depth: usize,
        at: DateTime<Utc>,
    },
    Complete {
        provider: ProviderId,
        total_elapsed: Duration,
    },
}

/// Observer for orchestrator events.
pub trait TelemetrySink: Send + Sync + Debug {
    fn record(&self, event: TelemetryEvent);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Sink that keeps every event in memory, for assertions.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Providers of recorded AttemptStart events, in order.
    pub fn attempted_providers(&self) -> Vec<ProviderId> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TelemetryEvent::AttemptStart { provider, .. } => Some(provider),
                _ => None,
            })
            .collect()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn record(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_telemetry_preserves_order() {
        let sink = RecordingTelemetry::new();
        let at = Utc::now();

        sink.record(TelemetryEvent::AttemptStart {
            provider: ProviderId::from("primary"),
            at,
        });
        sink.record(TelemetryEvent::AttemptEnd {
            provider: ProviderId::from("primary"),
            elapsed: Duration::from_millis(12),
            success: false,
        });
        sink.record(TelemetryEvent::FallbackDepth { depth: 1, at });

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], TelemetryEvent::AttemptStart { .. }));
        assert!(matches!(
            events[1],
            TelemetryEvent::AttemptEnd { success: false, .. }
        ));
        assert!(matches!(events[2], TelemetryEvent::FallbackDepth { depth: 1, .. }));
    }

    #[test]
    fn test_attempted_providers() {
        let sink = RecordingTelemetry::new();
        let at = Utc::now();

        for name in ["primary", "cache"] {
            sink.record(TelemetryEvent::AttemptStart {
                provider: ProviderId::from(name),
                at,
            });
        }

        let attempted = sink.attempted_providers();
        assert_eq!(
            attempted,
            vec![ProviderId::from("primary"), ProviderId::from("cache")]
        );
    }

    #[test]
    fn test_noop_telemetry_accepts_events() {
        NoopTelemetry.record(TelemetryEvent::FallbackDepth {
            depth: 2,
            at: Utc::now(),
        });
    }
}
