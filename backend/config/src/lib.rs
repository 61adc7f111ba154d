//! `linehook-config` — runtime configuration for the linehook webhook bot.
//!
//! Provides:
//! - Typed config schema (server, secrets bootstrap, LINE replies, logging)
//! - Environment loading with defaults and typed parse errors
//! - KMS key settings resolved separately for the bootstrap path
//! - Config redaction for safe logging
//! - Structural validation

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::EnvVars;
pub use redact::{collect_redacted_paths, redact};
pub use schema::{AppConfig, KmsKeyConfig, LineConfig, LogFormat, LoggingConfig, SecretsConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use linehook_core::ConfigError;

/// Load the application config from the process environment and validate it.
///
/// Validation warnings are logged; validation errors are turned into a
/// [`ConfigError::Invalid`] for the first offending field.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    prepare(AppConfig::from_env(&EnvVars::from_process())?)
}

fn prepare(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(error) = report.errors.into_iter().next() {
        return Err(ConfigError::Invalid {
            name: error.path,
            reason: error.message,
        });
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.server.webhook_path = "webhook".into();
        let err = prepare(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "server.webhookPath"));
    }

    #[test]
    fn prepare_accepts_defaults() {
        assert!(prepare(AppConfig::default()).is_ok());
    }
}
