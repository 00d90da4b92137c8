//! FirstCrack configuration system.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FirstCrackError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstCrackConfig {
    /// Deep-link scheme interpolated into every navigation target.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Base URL that relative media locators resolve against.
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub surfaces: SurfacesConfig,
}

fn default_scheme() -> String {
    crate::actions::DEFAULT_SCHEME.into()
}
fn default_media_base_url() -> String {
    "https://cdn.firstcrack.dev".into()
}

impl Default for FirstCrackConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            media_base_url: default_media_base_url(),
            transport: TransportConfig::default(),
            surfaces: SurfacesConfig::default(),
        }
    }
}

impl FirstCrackConfig {
    /// Load config from the default path (~/.firstcrack/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FirstCrackError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| FirstCrackError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| FirstCrackError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".firstcrack")
            .join("config.toml")
    }

    /// Resolve a relative media locator against the configured base.
    pub fn media_url(&self, locator: &str) -> String {
        format!("{}/{locator}", self.media_base_url.trim_end_matches('/'))
    }
}

/// Push transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// "console" logs payloads locally; "http" posts them to the gateway.
    #[serde(default = "default_transport_kind")]
    pub kind: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_transport_kind() -> String {
    "console".into()
}
fn default_gateway_url() -> String {
    "http://localhost:8787/push".into()
}
fn default_timeout() -> u64 {
    10
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: default_transport_kind(),
            gateway_url: default_gateway_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Per-surface toggles and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfacesConfig {
    #[serde(default = "bool_true")]
    pub android: bool,
    #[serde(default = "bool_true")]
    pub ios: bool,
    #[serde(default = "bool_true")]
    pub web: bool,
    /// Browsers cap visible notification actions; 2 is safe everywhere.
    #[serde(default = "default_web_max_actions")]
    pub web_max_actions: usize,
}

fn bool_true() -> bool {
    true
}
fn default_web_max_actions() -> usize {
    2
}

impl Default for SurfacesConfig {
    fn default() -> Self {
        Self {
            android: true,
            ios: true,
            web: true,
            web_max_actions: default_web_max_actions(),
        }
    }
}

impl SurfacesConfig {
    /// Effective web action cap, clamped to the 2-4 range browsers allow.
    pub fn web_action_cap(&self) -> usize {
        self.web_max_actions.clamp(2, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FirstCrackConfig::default();
        assert_eq!(config.scheme, "firstcrack");
        assert_eq!(config.transport.kind, "console");
        assert_eq!(config.transport.timeout_seconds, 10);
        assert_eq!(config.surfaces.web_action_cap(), 2);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            scheme = "brewlab"
            media_base_url = "https://media.example.com/"

            [transport]
            kind = "http"
            gateway_url = "https://push.example.com/send"
        "#;

        let config: FirstCrackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scheme, "brewlab");
        assert_eq!(config.transport.kind, "http");
        assert_eq!(config.transport.gateway_url, "https://push.example.com/send");
        // Untouched sections fall back to defaults.
        assert!(config.surfaces.web);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: FirstCrackConfig = toml::from_str("").unwrap();
        assert_eq!(config.scheme, "firstcrack");
        assert_eq!(config.media_base_url, "https://cdn.firstcrack.dev");
    }

    #[test]
    fn test_media_url_joins_without_double_slash() {
        let mut config = FirstCrackConfig::default();
        config.media_base_url = "https://media.example.com/".into();
        assert_eq!(
            config.media_url("stages/brewing.jpg"),
            "https://media.example.com/stages/brewing.jpg"
        );
    }

    #[test]
    fn test_web_action_cap_clamped() {
        let mut config = FirstCrackConfig::default();
        config.surfaces.web_max_actions = 9;
        assert_eq!(config.surfaces.web_action_cap(), 4);
        config.surfaces.web_max_actions = 0;
        assert_eq!(config.surfaces.web_action_cap(), 2);
    }
}
