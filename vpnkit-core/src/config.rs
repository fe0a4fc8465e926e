//! Client configuration supplied by the host app.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::secure_store::KeychainScope;

/// Keychain service used when the host does not provide one.
pub const DEFAULT_SERVICE: &str = "com.privateinternetaccess";

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}

/// Errors raised while loading or validating [`ClientConfig`].
#[derive(Debug, Error, uniffi::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// The keychain service name is empty.
    #[error("keychain service must not be empty")]
    EmptyService,
    /// A team identifier was given without an app group to scope it to.
    #[error("team_id requires app_group")]
    TeamWithoutGroup,
}

/// Host-provided settings for the client library.
///
/// ```json
/// { "service": "com.example.vpn", "app_group": "group.com.example.vpn", "team_id": "5357M5NW9W" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct ClientConfig {
    /// Keychain service all items are stored under.
    #[serde(default = "default_service")]
    pub service: String,
    /// App group to share credentials with extensions.
    #[serde(default)]
    pub app_group: Option<String>,
    /// Developer team the app group belongs to.
    #[serde(default)]
    pub team_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            app_group: None,
            team_id: None,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        config.scope()?;
        Ok(config)
    }

    /// Resolves the keychain scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is empty or a team is set without a group.
    pub fn scope(&self) -> Result<KeychainScope, ConfigError> {
        if self.service.trim().is_empty() {
            return Err(ConfigError::EmptyService);
        }
        match (&self.team_id, &self.app_group) {
            (None, None) => Ok(KeychainScope::Private),
            (None, Some(group)) => Ok(KeychainScope::Group {
                group: group.clone(),
            }),
            (Some(team), Some(group)) => Ok(KeychainScope::TeamGroup {
                team: team.clone(),
                group: group.clone(),
            }),
            (Some(_), None) => Err(ConfigError::TeamWithoutGroup),
        }
    }
}

/// Parses a [`ClientConfig`] from JSON.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the result fails validation.
#[uniffi::export]
pub fn client_config_from_json(json: &str) -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_json(json)
}
