//! Production telemetry sink
//!
//! Routes orchestrator events to the tracing pipeline and the `metrics`
//! facade; whichever exporter the host application installs picks them up.

use metrics::{counter, histogram};
use tracing::{debug, info};

use crate::domain::{TelemetryEvent, TelemetrySink};

/// Sink that logs events and publishes counters/histograms.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record(&self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::AttemptStart { provider, .. } => {
                debug!(provider = %provider, "tier attempt started");
                counter!("gateway_tier_attempts_total", "provider" => provider.as_str().to_string())
                    .increment(1);
            }
            TelemetryEvent::AttemptEnd {
                provider,
                elapsed,
                success,
            } => {
                debug!(provider = %provider, elapsed_ms = elapsed.as_millis() as u64, success, "tier attempt finished");
                histogram!("gateway_tier_attempt_duration_seconds", "provider" => provider.as_str().to_string())
                    .record(elapsed.as_secs_f64());
                if !success {
                    counter!("gateway_tier_failures_total", "provider" => provider.as_str().to_string())
                        .increment(1);
                }
            }
            TelemetryEvent::FallbackDepth { depth, .. } => {
                debug!(depth, "falling back to next tier");
                histogram!("gateway_fallback_depth").record(depth as f64);
            }
            TelemetryEvent::Complete {
                provider,
                total_elapsed,
            } => {
                info!(provider = %provider, total_ms = total_elapsed.as_millis() as u64, "tiered fetch complete");
                counter!("gateway_fetch_completions_total", "provider" => provider.as_str().to_string())
                    .increment(1);
                histogram!("gateway_fetch_duration_seconds").record(total_elapsed.as_secs_f64());
            }
        }
    }
}
