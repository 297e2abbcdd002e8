use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Aidboard
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AidboardConfig {
    /// Case-store (upstream REST API) settings
    pub store: StoreConfig,
    /// List-screen settings
    pub views: ViewConfig,
    /// Read-cache settings
    pub cache: CacheConfig,
    /// Online-users/notifications poller settings
    pub presence: PresenceConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Base URL of the case store
    pub base_url: String,
    /// API token (can be set via env var)
    pub token: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewConfig {
    /// Items per page on every list screen
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Time-to-live for cached list reads, in seconds
    pub ttl_seconds: u64,
    /// Maximum cached entries
    pub capacity: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresenceConfig {
    /// Poll interval for online users and notifications, in seconds
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
    /// Emit JSON-structured logs
    pub json_logs: bool,
}

impl Default for AidboardConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                base_url: "http://localhost:8000/api".to_string(),
                token: None, // Read from env var when absent
                request_timeout_seconds: 30,
            },
            views: ViewConfig { page_size: 10 },
            cache: CacheConfig {
                ttl_seconds: 300, // 5 minutes
                capacity: 1000,
            },
            presence: PresenceConfig {
                poll_interval_seconds: 60,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: true,
            },
        }
    }
}

impl AidboardConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (aidboard.toml)
    /// 3. Environment variables (prefixed with AIDBOARD_, double
    ///    underscore between levels: AIDBOARD_CACHE__TTL_SECONDS)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&AidboardConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("aidboard.toml").exists() {
            builder = builder.add_source(File::with_name("aidboard"));
        }

        // Double-underscore level separator keeps snake_case leaf fields
        // like ttl_seconds addressable.
        builder = builder.add_source(
            Environment::with_prefix("AIDBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut aidboard_config: AidboardConfig = config.try_deserialize()?;

        // Token may arrive through a dedicated env var outside the prefix scheme
        if aidboard_config.store.token.is_none() {
            if let Ok(token) = std::env::var("AIDBOARD_TOKEN") {
                aidboard_config.store.token = Some(token);
            }
        }

        Ok(aidboard_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<AidboardConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = AidboardConfig::load_env_file();
        AidboardConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static AidboardConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
