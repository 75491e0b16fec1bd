use crate::core::rate::RateRecord;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const ACCESS_KEY_ENV: &str = "EXCHANGERATE_API_KEY";
const CACHE_FILE_NAME: &str = "exchange-rate-cache.json";
const FJALL_DIR_NAME: &str = "rates";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.exchangerate.host".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            access_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Fjall,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Cache file (file backend) or database directory (fjall backend).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Written to an empty store at startup.
    #[serde(default)]
    pub seed: Option<RateRecord>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let data_dir = AppConfig::default_data_path()?;
        Ok(match self.backend {
            StoreBackend::Fjall => data_dir.join(FJALL_DIR_NAME),
            StoreBackend::File | StoreBackend::Memory => data_dir.join(CACHE_FILE_NAME),
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default().with_env_overrides());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        self.provider.access_key = resolve_access_key(
            self.provider.access_key.take(),
            std::env::var(ACCESS_KEY_ENV).ok(),
        );
        self
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("co", "usdcop", "usdcop")
            .context("Could not determine project directories")
    }
}

/// The environment wins over the file; blank values count as unset.
fn resolve_access_key(from_file: Option<String>, from_env: Option<String>) -> Option<String> {
    from_env
        .filter(|key| !key.trim().is_empty())
        .or(from_file.filter(|key| !key.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  bind_addr: "0.0.0.0:8080"
provider:
  base_url: "http://example.com/rates"
  access_key: "secret"
  timeout_secs: 3
store:
  backend: fjall
  path: "/var/lib/usdcop"
  seed:
    rate: 4000.0
    date: "2024-01-01"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.provider.access_key.as_deref(), Some("secret"));
        assert_eq!(config.provider.timeout_secs, 3);
        assert_eq!(config.store.backend, StoreBackend::Fjall);
        assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/usdcop")));
        assert_eq!(
            config.store.seed,
            Some(RateRecord {
                rate: 4000.0,
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            })
        );
        assert_eq!(
            config.store.resolved_path().unwrap(),
            PathBuf::from("/var/lib/usdcop")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.provider.base_url, "https://api.exchangerate.host");
        assert!(config.provider.access_key.is_none());
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert!(config.store.seed.is_none());
    }

    #[test]
    fn test_partial_provider_section() {
        let yaml_str = r#"
provider:
  base_url: "http://localhost:9999"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.provider.base_url, "http://localhost:9999");
        assert_eq!(config.provider.timeout_secs, 10);

        let config: AppConfig = serde_yaml::from_str("provider:\n  timeout_secs: 4\n").unwrap();
        assert_eq!(config.provider.base_url, "https://api.exchangerate.host");
        assert_eq!(config.provider.timeout_secs, 4);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let yaml_str = r#"
store:
  backend: redis
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }

    #[test]
    fn test_access_key_resolution() {
        assert_eq!(
            resolve_access_key(Some("file".into()), Some("env".into())),
            Some("env".to_string())
        );
        assert_eq!(
            resolve_access_key(Some("file".into()), None),
            Some("file".to_string())
        );
        assert_eq!(
            resolve_access_key(Some("file".into()), Some("  ".into())),
            Some("file".to_string())
        );
        assert_eq!(resolve_access_key(Some("".into()), None), None);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/usdcop/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
