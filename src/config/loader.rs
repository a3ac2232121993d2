//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4000");
        assert_eq!(config.database.url, "memory://things");
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:5000"

            [observability]
            log_level = "debug"
            log_format = "json"

            [database]
            seed_names = ["lamp"]

            [notifications]
            endpoint = "https://hooks.example.com/things"
            timeout_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.database.seed_names, vec!["lamp".to_string()]);
        assert_eq!(config.notifications.timeout_secs, 2);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_config("[listener\nbind_address = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = parse_config("[timeouts]\nrequest_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("timeouts.request_secs"));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("thing-server-missing-config.toml");
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "thing-server-config-{}.toml",
            uuid::Uuid::new_v4()
        ));
        fs::write(&path, "[listener]\nbind_address = \"127.0.0.1:4100\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4100");

        let _ = fs::remove_file(&path);
    }
}
