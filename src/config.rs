use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Environment variable selecting the config file
pub const CONFIG_PATH_ENV: &str = "EGO_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/local.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(rename = "shimoSDK")]
    pub shimo_sdk: ShimoSdkConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub sdkctl: SdkctlConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
        }
    }
}

/// Vendor account the harness signs requests for
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimoSdkConfig {
    pub host: String,
    pub app_id: String,
    pub app_secret: String,
    #[serde(default)]
    pub callback_version: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl ShimoSdkConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

fn default_expiration_hours() -> i64 {
    24
}

/// Batch harness settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SdkctlConfig {
    pub user_id: i64,
    pub resources_dir: PathBuf,
    pub report_dir: PathBuf,
    pub storage_dir: PathBuf,
    pub import_timeout_secs: u64,
    pub export_timeout_secs: u64,
    /// Pause between seat calls, the vendor rejects identical signatures
    pub system_call_interval_ms: u64,
    pub seat_test_user_ids: Vec<String>,
}

impl Default for SdkctlConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            resources_dir: PathBuf::from("resources"),
            report_dir: PathBuf::from("reports"),
            storage_dir: PathBuf::from("storage"),
            import_timeout_secs: 20,
            export_timeout_secs: 20,
            system_call_interval_ms: 2000,
            seat_test_user_ids: vec!["ensure_auto_increment".to_string()],
        }
    }
}

impl SdkctlConfig {
    pub fn import_timeout(&self) -> Duration {
        Duration::from_secs(self.import_timeout_secs)
    }

    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    pub fn system_call_interval(&self) -> Duration {
        Duration::from_millis(self.system_call_interval_ms)
    }
}

impl Config {
    /// Load the file named by `EGO_CONFIG_PATH` and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_path(path)
    }

    /// Load a config file and apply environment overrides
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Invalid("PORT"))?;
        }
        if let Ok(app_id) = env::var("SHIMO_APP_ID") {
            self.shimo_sdk.app_id = app_id;
        }
        if let Ok(secret) = env::var("SHIMO_APP_SECRET") {
            self.shimo_sdk.app_secret = secret;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.shimo_sdk.host.is_empty() {
            return Err(ConfigError::Missing("shimoSDK.host"));
        }
        if self.shimo_sdk.app_id.is_empty() {
            return Err(ConfigError::Missing("shimoSDK.appId"));
        }
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Missing("jwt.secret"));
        }
        Ok(())
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Missing config value: {0}")]
    Missing(&'static str),

    #[error("Invalid config value: {0}")]
    Invalid(&'static str),
}
