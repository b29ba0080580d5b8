//! Infrastructure layer - stores, providers, cache, orchestrator

pub mod cache;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod store;
pub mod telemetry;
