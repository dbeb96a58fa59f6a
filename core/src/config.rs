//! Client configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::client::DEFAULT_USER_ID;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the REST resource, without the `/todos` segment.
    pub base_url: String,
    /// Owner id every todo is created and listed under.
    pub user_id: i64,
    pub error_display_ms: u64,
    /// Length of the row enter/leave and editor exit transitions.
    pub transition_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            user_id: DEFAULT_USER_ID,
            error_display_ms: 3000,
            transition_ms: 300,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|e| ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError("base_url must not be empty".to_string()));
        }
        if self.user_id <= 0 {
            return Err(ConfigError(format!(
                "user_id must be positive, got {}",
                self.user_id
            )));
        }
        Ok(())
    }
}

/// The config text could not be parsed or holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid config: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.error_display(), Duration::from_millis(3000));
        assert_eq!(config.transition(), Duration::from_millis(300));
    }

    #[test]
    fn fields_override_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            base_url = "http://todos.test/api"
            user_id = 17
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://todos.test/api");
        assert_eq!(config.user_id, 17);
        assert_eq!(config.error_display_ms, 3000);
    }

    #[test]
    fn non_positive_owner_is_rejected() {
        let err = AppConfig::from_toml_str("user_id = 0").unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(AppConfig::from_toml_str("user_id = \"abc\"").is_err());
    }
}
