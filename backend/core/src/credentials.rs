//! Bot channel credentials recovered from the encrypted secrets blob.

use std::fmt;

use serde::Deserialize;

use crate::error::CredentialsError;

const CHANNEL_SECRET_FIELD: &str = "line_channel_secret";
const ACCESS_TOKEN_FIELD: &str = "line_channel_access_token";

/// Channel secret and access token for the messaging platform.
///
/// Immutable once built. `Debug` never prints either value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    channel_secret: String,
    channel_access_token: String,
}

#[derive(Deserialize)]
struct RawCredentials {
    line_channel_secret: Option<String>,
    line_channel_access_token: Option<String>,
}

impl Credentials {
    pub fn new(
        channel_secret: impl Into<String>,
        channel_access_token: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let channel_secret = channel_secret.into();
        let channel_access_token = channel_access_token.into();
        if channel_secret.is_empty() {
            return Err(CredentialsError::EmptyField(CHANNEL_SECRET_FIELD));
        }
        if channel_access_token.is_empty() {
            return Err(CredentialsError::EmptyField(ACCESS_TOKEN_FIELD));
        }
        Ok(Self {
            channel_secret,
            channel_access_token,
        })
    }

    /// Parse decrypted plaintext.
    ///
    /// Expects `{"line_channel_secret": "...", "line_channel_access_token": "..."}`;
    /// extra fields are ignored.
    pub fn from_json_slice(plaintext: &[u8]) -> Result<Self, CredentialsError> {
        let raw: RawCredentials =
            serde_json::from_slice(plaintext).map_err(|e| CredentialsError::Malformed {
                line: e.line(),
                column: e.column(),
            })?;
        let secret = raw
            .line_channel_secret
            .ok_or(CredentialsError::MissingField(CHANNEL_SECRET_FIELD))?;
        let token = raw
            .line_channel_access_token
            .ok_or(CredentialsError::MissingField(ACCESS_TOKEN_FIELD))?;
        Self::new(secret, token)
    }

    pub fn channel_secret(&self) -> &str {
        &self.channel_secret
    }

    pub fn channel_access_token(&self) -> &str {
        &self.channel_access_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("channel_secret", &format!("***({} bytes)", self.channel_secret.len()))
            .field(
                "channel_access_token",
                &format!("***({} bytes)", self.channel_access_token.len()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_fields() {
        let creds = Credentials::from_json_slice(
            br#"{"line_channel_secret":"s3cret","line_channel_access_token":"tok","extra":1}"#,
        )
        .unwrap();
        assert_eq!(creds.channel_secret(), "s3cret");
        assert_eq!(creds.channel_access_token(), "tok");
    }

    #[test]
    fn rejects_missing_field() {
        let err = Credentials::from_json_slice(br#"{"line_channel_secret":"s3cret"}"#).unwrap_err();
        assert_eq!(err, CredentialsError::MissingField("line_channel_access_token"));
    }

    #[test]
    fn rejects_empty_field() {
        let err = Credentials::from_json_slice(
            br#"{"line_channel_secret":"","line_channel_access_token":"tok"}"#,
        )
        .unwrap_err();
        assert_eq!(err, CredentialsError::EmptyField("line_channel_secret"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Credentials::from_json_slice(b"{not json").unwrap_err();
        assert!(matches!(err, CredentialsError::Malformed { line: 1, .. }));
    }

    #[test]
    fn debug_hides_secret_material() {
        let creds = Credentials::new("very-secret-value", "very-secret-token").unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("very-secret-value"));
        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("17 bytes"));
    }
}
