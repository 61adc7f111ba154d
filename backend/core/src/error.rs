use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Missing or malformed environment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Failure of the remote key-management decrypt call.
#[derive(Debug, Error)]
pub enum DecryptionError {
    #[error("could not obtain an access token: {0}")]
    Auth(String),

    #[error("key management request failed: {0}")]
    Transport(String),

    #[error("key management service rejected decrypt for {key} (HTTP {status}): {message}")]
    Rejected {
        key: String,
        status: u16,
        message: String,
    },

    #[error("decrypt call timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed decrypt response: {0}")]
    MalformedResponse(String),
}

/// Decrypted plaintext that does not describe a usable set of credentials.
///
/// Variants never carry plaintext content, only positions and field names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("plaintext is not valid credentials JSON (line {line}, column {column})")]
    Malformed { line: usize, column: usize },

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),
}

/// Anything that stops the process from reaching the ready state.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("storage error: cannot read ciphertext at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("decryption error: {0}")]
    Decryption(#[from] DecryptionError),

    #[error("parse error: {0}")]
    Parse(#[from] CredentialsError),
}

/// Why a webhook signature was not accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing x-line-signature header")]
    Missing,

    #[error("signature is not valid base64")]
    Encoding,

    #[error("signature does not match request body")]
    Mismatch,
}

/// Request-level rejection. Maps to HTTP 400 at the request boundary.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid signature: {0}")]
    Validation(#[from] SignatureError),

    #[error("malformed webhook body: {0}")]
    Parse(String),
}

/// Failure of a single outbound reply call.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply request failed: {0}")]
    Transport(String),

    #[error("reply timed out")]
    Timeout,

    #[error("reply rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}
