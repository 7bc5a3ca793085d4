//! Application configuration

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};

/// Builder field read as the key label when none is configured
pub const DEFAULT_LABEL_FIELD: &str = "branch";

/// Builder field naming a per-builder key file
pub const SECRET_KEY_FILE_FIELD: &str = "secretKeyFile";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON file holding the default key file and builder configs
    pub webhook_config: Option<PathBuf>,
    /// Overrides `secretKeyFile` from the webhook config
    pub secret_key_file: Option<PathBuf>,
    pub label_field: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            webhook_config: env::var("WEBHOOK_CONFIG").ok().map(PathBuf::from),
            secret_key_file: env::var("WEBHOOK_SECRET_FILE").ok().map(PathBuf::from),
            label_field: env::var("KEY_LABEL_FIELD")
                .unwrap_or_else(|_| DEFAULT_LABEL_FIELD.to_string()),
        }
    }
}

/// Key configuration: a default key file plus per-builder records.
///
/// Builders are kept as raw JSON so hosts can carry whatever else they need
/// in them; only the label field and `secretKeyFile` are read here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    #[serde(default)]
    pub secret_key_file: Option<PathBuf>,
    #[serde(default)]
    pub builders: Vec<Value>,
}

impl WebhookConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_webhook_config() {
        let config = WebhookConfig::from_json(
            r#"{
                "secretKeyFile": "/etc/pages/default.key",
                "builders": [
                    {"branch": "18f-pages", "secretKeyFile": "/etc/pages/18f-pages.key"},
                    {"branch": "18f-pages-staging", "repositoryDir": "repos/staging"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.secret_key_file,
            Some(PathBuf::from("/etc/pages/default.key"))
        );
        assert_eq!(config.builders.len(), 2);
        assert_eq!(config.builders[0]["branch"], "18f-pages");
    }

    #[test]
    fn test_parse_empty_webhook_config() {
        let config = WebhookConfig::from_json("{}").unwrap();
        assert!(config.secret_key_file.is_none());
        assert!(config.builders.is_empty());
    }

    #[test]
    fn test_parse_invalid_webhook_config() {
        let err = WebhookConfig::from_json("{\"builders\": 7}").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_webhook_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"builders": [{{"branch": "main"}}]}}"#).unwrap();

        let config = WebhookConfig::load(file.path()).unwrap();
        assert_eq!(config.builders.len(), 1);
    }

    #[test]
    fn test_load_missing_webhook_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = WebhookConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }
}
