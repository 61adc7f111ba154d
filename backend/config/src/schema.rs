//! Typed configuration schema.

use std::path::PathBuf;
use std::str::FromStr;

use linehook_core::{ConfigError, KeyIdentifier};
use serde::{Deserialize, Serialize};

use crate::defaults::*;
use crate::env::EnvVars;

pub const ENV_PROJECT_ID: &str = "GCP_PROJECT_ID";
pub const ENV_KEY_RING: &str = "KMS_KEY_RING_NAME";
pub const ENV_KEY_NAME: &str = "KMS_LINE_SECRETS_KEY_NAME";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Full runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub server: ServerConfig,
    pub secrets: SecretsConfig,
    pub line: LineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub webhook_path: String,
}

/// Where the ciphertext lives and how to reach the key-management service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsConfig {
    pub ciphertext_path: PathBuf,
    pub kms_endpoint: String,
    pub kms_timeout_secs: u64,
    /// Static OAuth token; when absent the metadata server is asked.
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfig {
    pub api_base: String,
    pub reply_timeout_secs: u64,
    pub reply_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format \"{other}\" (expected pretty or json)")),
        }
    }
}

/// Key-management key coordinates. All three values are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmsKeyConfig {
    pub project_id: String,
    pub key_ring: String,
    pub key_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            ciphertext_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            kms_endpoint: DEFAULT_KMS_ENDPOINT.to_string(),
            kms_timeout_secs: DEFAULT_KMS_TIMEOUT_SECS,
            access_token: None,
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_LINE_API_BASE.to_string(),
            reply_timeout_secs: DEFAULT_REPLY_TIMEOUT_SECS,
            reply_text: DEFAULT_REPLY_TEXT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Build from environment variables, applying defaults for anything unset.
    pub fn from_env(env: &EnvVars) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig {
                bind_address: env.string_or("LINEHOOK_BIND", DEFAULT_BIND_ADDRESS),
                port: env.parse_or("PORT", DEFAULT_PORT)?,
                webhook_path: env.string_or("LINEHOOK_WEBHOOK_PATH", DEFAULT_WEBHOOK_PATH),
            },
            secrets: SecretsConfig {
                ciphertext_path: env
                    .get("LINEHOOK_SECRETS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_PATH)),
                kms_endpoint: env.string_or("LINEHOOK_KMS_ENDPOINT", DEFAULT_KMS_ENDPOINT),
                kms_timeout_secs: env
                    .parse_or("LINEHOOK_KMS_TIMEOUT_SECS", DEFAULT_KMS_TIMEOUT_SECS)?,
                access_token: env.get(ENV_ACCESS_TOKEN).map(str::to_owned),
            },
            line: LineConfig {
                api_base: env.string_or("LINEHOOK_LINE_API_BASE", DEFAULT_LINE_API_BASE),
                reply_timeout_secs: env
                    .parse_or("LINEHOOK_REPLY_TIMEOUT_SECS", DEFAULT_REPLY_TIMEOUT_SECS)?,
                reply_text: env.string_or("LINEHOOK_REPLY_TEXT", DEFAULT_REPLY_TEXT),
            },
            logging: LoggingConfig {
                level: env.string_or("LINEHOOK_LOG_LEVEL", DEFAULT_LOG_LEVEL),
                format: env.parse_or("LINEHOOK_LOG_FORMAT", LogFormat::default())?,
                dir: env.get("LINEHOOK_LOG_DIR").map(PathBuf::from),
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

impl KmsKeyConfig {
    pub fn from_env(env: &EnvVars) -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: env.required(ENV_PROJECT_ID)?,
            key_ring: env.required(ENV_KEY_RING)?,
            key_name: env.required(ENV_KEY_NAME)?,
        })
    }

    pub fn key_identifier(&self) -> KeyIdentifier {
        KeyIdentifier::new(&self.project_id, &self.key_ring, &self.key_name)
    }
}
