//! Time source abstraction
//!
//! Cache freshness and telemetry timestamps all go through [`Clock`] so that
//! tests can advance time deterministically instead of sleeping.

use std::fmt::Debug;

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time, always UTC.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
