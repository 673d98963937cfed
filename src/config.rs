use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AomigoConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub assistant: AssistantConfig,
    pub review: ReviewConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub default_pet_name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssistantConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReviewConfig {
    /// Interval ladder in days. Index 0 is the bootstrap rung and schedules
    /// `first_review_minutes` ahead instead of a whole day.
    pub intervals: Vec<u32>,
    pub first_review_minutes: i64,
}

impl Default for AomigoConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            assistant: AssistantConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_aomigo_dir()
            .join("aomigo.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            default_pet_name: "Aomigo".into(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: "mock".into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            intervals: crate::learning::schedule::REVIEW_INTERVALS.to_vec(),
            first_review_minutes: 10,
        }
    }
}

/// Returns `~/.aomigo/`
pub fn default_aomigo_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".aomigo")
}

/// Returns the default config file path: `~/.aomigo/config.toml`
pub fn default_config_path() -> PathBuf {
    default_aomigo_dir().join("config.toml")
}

impl AomigoConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            AomigoConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (AOMIGO_DB, AOMIGO_PORT,
    /// AOMIGO_LOG_LEVEL, AOMIGO_ASSISTANT, OPENAI_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AOMIGO_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("AOMIGO_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("AOMIGO_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("AOMIGO_ASSISTANT") {
            self.assistant.provider = val;
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.assistant.api_key = Some(val);
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AomigoConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.assistant.provider, "mock");
        assert_eq!(config.review.intervals, vec![0, 1, 3, 7, 14, 30, 60]);
        assert_eq!(config.review.first_review_minutes, 10);
        assert!(config.storage.db_path.ends_with("aomigo.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
port = 9000
log_level = "debug"

[storage]
db_path = "/tmp/test.db"

[assistant]
provider = "openai"
model = "gpt-4o"
"#;
        let config: AomigoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.assistant.provider, "openai");
        assert_eq!(config.assistant.model, "gpt-4o");
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.default_pet_name, "Aomigo");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AomigoConfig::default();
        std::env::set_var("AOMIGO_DB", "/tmp/override.db");
        std::env::set_var("AOMIGO_PORT", "8123");
        std::env::set_var("AOMIGO_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("AOMIGO_DB");
        std::env::remove_var("AOMIGO_PORT");
        std::env::remove_var("AOMIGO_LOG_LEVEL");
    }
}
