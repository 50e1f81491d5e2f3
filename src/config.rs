use crate::api::constants;
use crate::api::logging::MonitoringConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "resale-cli";
pub const API_URL_ENV: &str = "RESALE_API_URL";
pub const STORE_PATH_ENV: &str = "RESALE_STORE_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    constants::USER_AGENT.to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Database file; defaults to `store.db` next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_DIR)
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_DIR))
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// Load the config file (writing defaults on first run) and apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            info!("Config file doesn't exist, creating default config");
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config: Config =
            toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.api.base_url = normalise_base_url(&config.api.base_url)
            .with_context(|| format!("Invalid api.base_url in {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", path);
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Environment overrides; `lookup` is `std::env::var` outside tests
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = normalise_base_url(&url).with_context(|| format!("Invalid {}", API_URL_ENV))?;
            debug!("API base URL overridden from environment: {}", self.api.base_url);
        }
        if let Some(path) = lookup(STORE_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.store.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Where the local store lives
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_config_dir()?.join("store.db")),
        }
    }
}

/// Check the URL is absolute http(s) and drop any trailing slash
pub fn normalise_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let parsed = reqwest::Url::parse(trimmed).with_context(|| format!("'{}' is not a valid URL", trimmed))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("'{}' must use http or https", trimmed);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::logging::LogLevel;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, constants::DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nbase_url = \"http://localhost:3000/\"\n\n[monitoring]\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.monitoring.log_level, LogLevel::Debug);
        assert!(config.monitoring.correlation_ids);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.store.path = Some(dir.path().join("kv.db"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.store.path, Some(dir.path().join("kv.db")));
        assert_eq!(loaded.store_path().unwrap(), dir.path().join("kv.db"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_URL_ENV, "https://staging.example.com/api/"),
            (STORE_PATH_ENV, "/tmp/resale.db"),
        ]);

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "https://staging.example.com/api");
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/resale.db")));
    }

    #[test]
    fn test_invalid_urls_are_rejected() {
        assert!(normalise_base_url("not a url").is_err());
        assert!(normalise_base_url("ftp://example.com").is_err());

        let mut config = Config::default();
        assert!(config.apply_overrides(|_| Some("::".to_string())).is_err());
    }
}
