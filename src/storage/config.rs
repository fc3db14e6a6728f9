use super::Result;
use crate::api::session::{DEFAULT_API_VERSION, SessionConfig};
use crate::error::{ConfigError, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const APP_DIR: &str = "bleau";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Connection settings for one Tableau server. The token secret is never
/// written here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub server_url: String,
    pub token_name: Option<String>,
    pub site_id: Option<String>,
    pub api_version: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Profile {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Turn the profile into a session config using `token_secret`
    pub fn session_config(&self, token_secret: &str) -> std::result::Result<SessionConfig, ConfigError> {
        let token_name = self
            .token_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "token_name".to_string(),
                hint: "Pass --token-name or run 'bleau config set --token-name <name>'".to_string(),
            })?;

        let mut config = SessionConfig::new(&self.server_url, token_name, token_secret)
            .with_api_version(self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION));
        if let Some(site) = &self.site_id {
            config = config.with_site(site);
        }
        if let Some(secs) = self.timeout_seconds {
            config = config.with_timeout(secs);
        }
        Ok(config)
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: e.to_string(),
            })?;

        Ok(config)
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigSaveFailed {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// `<config_dir>/bleau/config.toml`
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Config file inside an explicit directory (`--config-dir`)
    pub fn file_in(dir: impl Into<PathBuf>) -> PathBuf {
        dir.into().join(CONFIG_FILE)
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Name of the profile to use: explicit choice, then the configured
    /// default, then `"default"`
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }
}
