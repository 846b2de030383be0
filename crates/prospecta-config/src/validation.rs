// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and non-empty paths.

use thiserror::Error;

use crate::model::ProspectaConfig;

/// A configuration error: either a Figment extraction failure or a semantic
/// validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parsing or type extraction failed.
    #[error("config parse error: {0}")]
    Parse(String),

    /// A semantic constraint on a config value failed.
    #[error("config validation error: {message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ProspectaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let level = config.log.level.trim();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{level}` is not one of trace, debug, info, warn, error"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Print collected config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("prospecta: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProspectaConfig;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ProspectaConfig::default()).is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = ProspectaConfig::default();
        config.server.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("server.port")));
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let mut config = ProspectaConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("database_path"));
    }

    #[test]
    fn all_errors_are_collected_not_fail_fast() {
        let mut config = ProspectaConfig::default();
        config.server.port = 0;
        config.storage.database_path = String::new();
        config.log.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = ProspectaConfig::default();
        config.log.level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }
}
