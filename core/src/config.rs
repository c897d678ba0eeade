use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const BASE_URL_ENV: &str = "DOC_TRANSLATOR_BASE_URL";
pub const CSRF_TOKEN_ENV: &str = "DOC_TRANSLATOR_CSRF_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Directory name under the platform config dir shared by the service config
/// and the preference store.
pub const APP_DIR: &str = "doc-translator";
const CONFIG_FILE: &str = "config.json";

/// Where the translation backend lives and, when the deployment requires it,
/// the anti-forgery token sent with mutating requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, content).map_err(|e| format!("Failed to write config file: {}", e))
    }

    /// Loads the file when present, then lets environment variables override
    /// individual fields. A missing file means defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let mut config = if path.as_ref().exists() {
            Self::from_json_file(&path).unwrap_or_else(|error| {
                log::warn!("ignoring unreadable service config: {error}");
                Self::default()
            })
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config
    }

    /// Loads `<config dir>/doc-translator/config.json` when the platform has
    /// a configuration directory; defaults plus env overrides otherwise.
    pub fn load_default() -> Self {
        match dirs::config_dir() {
            Some(dir) => Self::load(dir.join(APP_DIR).join(CONFIG_FILE)),
            None => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }
        if let Ok(token) = std::env::var(CSRF_TOKEN_ENV) {
            let trimmed = token.trim();
            if !trimmed.is_empty() {
                self.csrf_token = Some(trimmed.to_string());
            }
        }
    }
}
