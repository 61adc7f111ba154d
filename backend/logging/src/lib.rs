//! Structured logging for linehook.
//!
//! Handles console/JSON output, optional NDJSON file rotation, and scrubbing of
//! token-like strings before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LoggerGuard};
pub use redact::redact_sensitive_data;
