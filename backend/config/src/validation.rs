//! Config validation: structural checks with field paths.

use crate::schema::AppConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &AppConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_secrets(config, &mut report);
    validate_line(config, &mut report);
    report
}

fn validate_server(config: &AppConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
    if !server.webhook_path.starts_with('/') {
        report.error("server.webhookPath", "Webhook path must start with '/'");
    }
    if server.webhook_path == "/healthz" {
        report.error("server.webhookPath", "Webhook path collides with the health endpoint");
    }
    if server.port == 0 {
        report.warn("server.port", "Port 0 binds an ephemeral port");
    }
}

fn validate_secrets(config: &AppConfig, report: &mut ValidationReport) {
    let secrets = &config.secrets;
    if secrets.kms_timeout_secs == 0 {
        report.error("secrets.kmsTimeoutSecs", "Decrypt timeout must be at least one second");
    }
    if !secrets.kms_endpoint.starts_with("https://") {
        report.warn("secrets.kmsEndpoint", "KMS endpoint is not HTTPS");
    }
}

fn validate_line(config: &AppConfig, report: &mut ValidationReport) {
    let line = &config.line;
    if line.reply_timeout_secs == 0 {
        report.error("line.replyTimeoutSecs", "Reply timeout must be at least one second");
    }
    if line.reply_text.trim().is_empty() {
        report.error("line.replyText", "Reply text cannot be empty");
    }
    if !line.api_base.starts_with("https://") {
        report.warn("line.apiBase", "LINE API base is not HTTPS");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let report = validate(&AppConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_timeouts_are_errors() {
        let mut config = AppConfig::default();
        config.secrets.kms_timeout_secs = 0;
        config.line.reply_timeout_secs = 0;
        let report = validate(&config);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["secrets.kmsTimeoutSecs", "line.replyTimeoutSecs"]);
    }

    #[test]
    fn plain_http_endpoint_only_warns() {
        let mut config = AppConfig::default();
        config.line.api_base = "http://localhost:9999".into();
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
