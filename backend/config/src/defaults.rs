//! Default values for every optional setting.

/// Ciphertext blob path, relative to the working directory.
pub const DEFAULT_SECRETS_PATH: &str = "secrets.json.enc";

pub const DEFAULT_KMS_ENDPOINT: &str = "https://cloudkms.googleapis.com";

/// Upper bound on the bootstrap decrypt call.
pub const DEFAULT_KMS_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me";

/// Upper bound on each outbound reply call.
pub const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 10;

/// Fixed reply sent for every message event.
pub const DEFAULT_REPLY_TEXT: &str = "Test";

pub const DEFAULT_LOG_LEVEL: &str = "info";
