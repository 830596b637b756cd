use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the sample board
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SampleBoardConfig {
    /// Workflow REST API settings
    pub api: ApiConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Board presentation settings
    pub board: BoardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the merchandising API, e.g. `https://erp.example.com/api`
    pub base_url: String,
    /// Bearer token (can be set via env var)
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Client-side rate limiting
    pub rate_limit: RateLimitConfig,
    /// Read cache TTL; 0 disables caching
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human readable output
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Characters of a card description shown before truncation
    pub description_preview_chars: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            token: None, // Read from SAMPLE_BOARD_API_TOKEN
            timeout_seconds: 30,
            rate_limit: RateLimitConfig {
                requests_per_second: 10,
                burst_capacity: 20,
            },
            cache_ttl_seconds: 0,
        }
    }
}

impl Default for SampleBoardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
            board: BoardConfig {
                description_preview_chars: 120,
            },
        }
    }
}

impl SampleBoardConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (sample-board.toml, .sample-board-rc)
    /// 3. Environment variables (prefixed with SAMPLE_BOARD_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&SampleBoardConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("sample-board.toml").exists() {
            builder = builder.add_source(File::with_name("sample-board"));
        }

        if Path::new(".sample-board-rc").exists() {
            builder = builder.add_source(
                File::with_name(".sample-board-rc").format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("SAMPLE_BOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut board_config: SampleBoardConfig = builder.build()?.try_deserialize()?;

        if board_config.api.token.is_none() {
            if let Ok(token) = std::env::var("SAMPLE_BOARD_API_TOKEN") {
                board_config.api.token = Some(token);
            }
        }

        Ok(board_config)
    }

    /// Load from a specific TOML file layered over the defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Config::try_from(&SampleBoardConfig::default())?;
        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).format(config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
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
static CONFIG: std::sync::LazyLock<Result<SampleBoardConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = SampleBoardConfig::load_env_file();
        SampleBoardConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static SampleBoardConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SampleBoardConfig::default();
        assert_eq!(config.api.cache_ttl_seconds, 0);
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.board.description_preview_chars, 120);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample-board.toml");

        let mut config = SampleBoardConfig::default();
        config.api.base_url = "https://erp.example.com/api".to_string();
        config.api.cache_ttl_seconds = 15;
        config.save_to_file(&path).unwrap();

        let loaded = SampleBoardConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://erp.example.com/api");
        assert_eq!(loaded.api.cache_ttl_seconds, 15);
        assert_eq!(loaded.api.rate_limit.burst_capacity, 20);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://erp.local/api\"\n").unwrap();

        let loaded = SampleBoardConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://erp.local/api");
        assert_eq!(loaded.api.timeout_seconds, 30);
        assert_eq!(loaded.observability.log_level, "info");
    }
}
