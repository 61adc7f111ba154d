//! Log Redaction
//!
//! Scrubs bearer tokens, OAuth access tokens, and long opaque token strings
//! from text that echoes upstream responses before it is logged.

use regex::Regex;
use std::sync::LazyLock;

static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static GOOGLE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ya29\.[a-zA-Z0-9\-_\.]+").unwrap());
// LINE long-lived channel access tokens are ~170 chars of base64.
static OPAQUE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9+/]{100,}={0,2}").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = GOOGLE_TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    OPAQUE_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "auth failed for Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 and ya29.a0AfH6SMC-x_y";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(!clean.contains("ya29.a0AfH6SMC"));
        assert!(clean.starts_with("auth failed for [REDACTED_TOKEN]"));
    }

    #[test]
    fn redacts_long_opaque_tokens() {
        let token = "A".repeat(172);
        let clean = redact_sensitive_data(&format!("{{\"message\":\"bad token {token}\"}}"));
        assert_eq!(clean, "{\"message\":\"bad token [REDACTED_TOKEN]\"}");
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let raw = "{\"message\":\"Invalid reply token\"}";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
