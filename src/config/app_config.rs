use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub store: StoreSettings,
    pub cache: CacheSettings,
    pub orchestrator: OrchestratorSettings,
    pub providers: ProviderSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Backing file for the `file` backend.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub max_entries: usize,
    pub precision: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    pub deadline_ms: u64,
    pub tier_timeout_ms: u64,
    pub terminal_allowance_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub primary: RemoteProviderSettings,
    /// Regional tier, attempted only inside its bounds. Absent means the
    /// chain goes straight from the primary tier to the cache.
    pub regional: Option<RegionalProviderSettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteProviderSettings {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionalProviderSettings {
    pub name: String,
    pub base_url: String,
    pub bounds: RegionBounds,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: "data/geocache.json".to_string(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 6 * 3600,
            max_entries: 100,
            precision: 5,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            deadline_ms: 8000,
            tier_timeout_ms: 3000,
            terminal_allowance_ms: 250,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            primary: RemoteProviderSettings::default(),
            // UK + Ireland box used by the bundled regional data
            regional: Some(RegionalProviderSettings {
                name: "uk-bundles".to_string(),
                base_url: "http://localhost:8082/api/uk-bundles".to_string(),
                bounds: RegionBounds {
                    lat_min: 49.0,
                    lat_max: 62.0,
                    lon_min: -12.0,
                    lon_max: 3.0,
                },
            }),
        }
    }
}

impl Default for RemoteProviderSettings {
    fn default() -> Self {
        Self {
            name: "effis".to_string(),
            base_url: "http://localhost:8081/api/risk".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
