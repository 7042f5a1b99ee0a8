//! Client configuration, constructed once at startup.
//!
//! The host application builds or loads one [`ClientConfig`] and passes it
//! to whatever needs it; there is no ambient global.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persistent client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Last used server hostname.
    pub hostname: String,
    /// Last used server port.
    pub port: u16,
    /// UI theme, `"dark"` or `"light"`.
    pub theme: String,
    /// Connect to the last server on startup.
    pub auto_connect: bool,
    /// Request the scene geometry right after connecting.
    pub auto_scene_load: bool,
    /// Request the rendered image right after connecting.
    pub auto_image_load: bool,
    /// Default opacity for traced path segments.
    pub path_opacity: f32,
    /// Default size for traced path segments.
    pub path_size: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 50013,
            theme: "dark".to_string(),
            auto_connect: false,
            auto_scene_load: false,
            auto_image_load: false,
            path_opacity: 1.0,
            path_size: 1.0,
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file; a missing or unreadable file yields the
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let mut config: Self = std::fs::read_to_string(path.as_ref())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        if config.theme != "dark" && config.theme != "light" {
            warn!("Unknown theme '{}', falling back to dark", config.theme);
            config.theme = "dark".to_string();
        }
        config
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.port, 50013);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.path_opacity, 1.0);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = ClientConfig::load("/nonexistent/config.json");
        assert_eq!(config.port, ClientConfig::default().port);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"port": 7777}"#).unwrap();
        assert_eq!(config.port, 7777);
        assert_eq!(config.hostname, "localhost");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = ClientConfig {
            hostname: "render-farm".to_string(),
            port: 6000,
            ..ClientConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path);
        assert_eq!(loaded.hostname, "render-farm");
        assert_eq!(loaded.port, 6000);
    }
}
