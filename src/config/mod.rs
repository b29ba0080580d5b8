mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, LogFormat, LoggingConfig, OrchestratorSettings, ProviderSettings,
    RegionBounds, RegionalProviderSettings, RemoteProviderSettings, StoreBackend, StoreSettings,
};
