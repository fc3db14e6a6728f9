use crate::AppError;
use crate::error::{CliError, ConfigError};
use crate::storage::config::{Config, Profile};
use crate::utils::validation::validate_url;
use std::path::PathBuf;

/// Configuration service for managing connection profiles
pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.config.profiles.get(name)
    }

    /// Profile by name, failing when it does not exist
    pub fn require_profile(&self, name: &str) -> Result<&Profile, AppError> {
        self.get_profile(name).ok_or_else(|| {
            ConfigError::ProfileNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn get_default_profile(&self) -> Option<&String> {
        self.config.default_profile.as_ref()
    }

    /// Set one user-facing profile field, creating the profile if needed
    pub fn set_profile_field(
        &mut self,
        profile: &str,
        field: &str,
        value: &str,
    ) -> Result<(), AppError> {
        let entry = self
            .config
            .profiles
            .entry(profile.to_string())
            .or_default();

        match field {
            "server" => {
                validate_url(value)?;
                entry.server_url = value.trim_end_matches('/').to_string();
            }
            "token-name" => entry.token_name = Some(value.to_string()),
            "site" => entry.site_id = Some(value.to_string()),
            "api-version" => entry.api_version = Some(value.to_string()),
            "timeout" => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "expected a number of seconds".to_string(),
                })?;
                entry.timeout_seconds = Some(secs);
            }
            _ => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown field: {}. Use 'server', 'token-name', 'site', 'api-version' or 'timeout'",
                    field
                ))
                .into());
            }
        }

        if self.config.default_profile.is_none() {
            self.config.default_profile = Some(profile.to_string());
        }
        Ok(())
    }

    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }

    /// Profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.config.profiles.iter().collect();
        profiles.sort_by(|a, b| a.0.cmp(b.0));
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_profile_fields() {
        let mut service = ConfigService::new(Config::default());
        service
            .set_profile_field("prod", "server", "https://tableau.example.test/")
            .unwrap();
        service
            .set_profile_field("prod", "token-name", "ci-token")
            .unwrap();
        service.set_profile_field("prod", "site", "marketing").unwrap();
        service.set_profile_field("prod", "timeout", "45").unwrap();

        let profile = service.require_profile("prod").unwrap();
        assert_eq!(profile.server_url, "https://tableau.example.test");
        assert_eq!(profile.token_name.as_deref(), Some("ci-token"));
        assert_eq!(profile.site_id.as_deref(), Some("marketing"));
        assert_eq!(profile.timeout_seconds, Some(45));
        assert_eq!(service.get_default_profile().map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_set_profile_field_rejects_unknown_and_invalid() {
        let mut service = ConfigService::new(Config::default());

        let result = service.set_profile_field("test", "server_url", "https://example.test");
        assert!(format!("{:?}", result).contains("Unknown field: server_url"));

        let result = service.set_profile_field("test", "server", "not a url");
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.set_profile_field("test", "timeout", "soon");
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_require_missing_profile() {
        let service = ConfigService::new(Config::default());
        assert!(matches!(
            service.require_profile("ghost"),
            Err(AppError::Config(ConfigError::ProfileNotFound { .. }))
        ));
    }

    #[test]
    fn test_save_and_list() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut service = ConfigService::new(Config::default());
        service
            .set_profile_field("b", "server", "https://b.example.test")
            .unwrap();
        service
            .set_profile_field("a", "server", "https://a.example.test")
            .unwrap();
        service.save_config(Some(path.clone())).unwrap();

        let reloaded = ConfigService::new(Config::load(Some(path)).unwrap());
        let names: Vec<_> = reloaded
            .list_profiles()
            .into_iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
