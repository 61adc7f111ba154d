//! LINE Webhook Receiver
//!
//! Handles inbound payloads from LINE Messaging API webhooks,
//! including signature validation and event deserialization.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use linehook_core::{SignatureError, WebhookError};
use sha2::Sha256;

use crate::line_events::{WebhookEvent, WebhookPayload};

/// Header carrying base64(HMAC-SHA256(channel secret, raw body)).
pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

pub struct LineReceive;

impl LineReceive {
    /// Validates the `x-line-signature` against the channel secret.
    ///
    /// Comparison is constant-time.
    pub fn verify_signature(
        channel_secret: &str,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SignatureError::Missing)?;
        let expected = STANDARD
            .decode(signature)
            .map_err(|_| SignatureError::Encoding)?;
        let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
            .map_err(|_| SignatureError::Mismatch)?;
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Signature the platform would send for `body`.
    #[cfg(test)]
    pub(crate) fn compute_signature(channel_secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).unwrap();
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Parses a validated body into events, preserving delivery order.
    pub fn parse_events(body: &[u8]) -> Result<Vec<WebhookEvent>, WebhookError> {
        serde_json::from_slice::<WebhookPayload>(body)
            .map(|payload| payload.events)
            .map_err(|e| WebhookError::Parse(e.to_string()))
    }
}
