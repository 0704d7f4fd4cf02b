//! Application Configuration
//!
//! Read from a JSON document embedded in the host page:
//!
//! ```html
//! <script id="app-config" type="application/json">
//!   { "backend": { "apiKey": "...", "authDomain": "...", "projectId": "...", "appId": "..." },
//!     "collection": "tasks", "logLevel": "info" }
//! </script>
//! ```
//!
//! Without a `backend` section the app runs in local demo mode.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element id of the embedded configuration script
pub const CONFIG_ELEMENT_ID: &str = "app-config";

const DEFAULT_COLLECTION: &str = "tasks";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("collection name must not be empty")]
    EmptyCollection,
    #[error("backend.{0} must not be empty")]
    MissingField(&'static str),
}

/// Hosted backend settings, passed through to the SDK unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
}

impl BackendConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("apiKey", &self.api_key),
            ("authDomain", &self.auth_domain),
            ("projectId", &self.project_id),
            ("appId", &self.app_id),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::MissingField(*name)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub backend: Option<BackendConfig>,
    /// Remote collection holding the tasks
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: None,
            collection: default_collection(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        if config.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        if let Some(backend) = &config.backend {
            backend.validate()?;
        }
        Ok(config)
    }

    /// Load from the page; a missing element yields the defaults
    pub fn from_document() -> Result<Self, ConfigError> {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match text {
            Some(json) if !json.trim().is_empty() => Self::from_json(&json),
            _ => Ok(Self::default()),
        }
    }

    /// Unknown level names fall back to `Info`
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn is_demo(&self) -> bool {
        self.backend.is_none()
    }
}
