use async_trait::async_trait;

use crate::error::{DecryptionError, ReplyError};
use crate::message::OutboundMessage;
use crate::types::KeyIdentifier;

/// Remote key-management service performing envelope decryption.
#[async_trait]
pub trait KeyManagementClient: Send + Sync {
    /// Decrypt `ciphertext` with the key named by `key`.
    async fn decrypt(
        &self,
        key: &KeyIdentifier,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, DecryptionError>;
}

/// Outbound reply operation of the messaging platform.
#[async_trait]
pub trait MessageReplier: Send + Sync {
    /// Send `messages` as the reply addressed by the single-use `reply_token`.
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), ReplyError>;
}
