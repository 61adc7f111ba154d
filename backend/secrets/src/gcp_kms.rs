/// Cloud KMS REST client.
///
/// Calls `POST {endpoint}/v1/{key}:decrypt` with a base64 ciphertext and
/// decodes the base64 plaintext from the response.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use linehook_config::SecretsConfig;
use linehook_core::{DecryptionError, KeyIdentifier, KeyManagementClient};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::token::AccessTokenSource;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DecryptRequest {
    ciphertext: String,
}

#[derive(Deserialize)]
struct DecryptResponse {
    /// Omitted by the API when the plaintext is empty.
    #[serde(default)]
    plaintext: String,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
    status: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GcpKmsClient {
    http: Client,
    endpoint: String,
    tokens: AccessTokenSource,
}

impl GcpKmsClient {
    pub fn new(endpoint: impl Into<String>, tokens: AccessTokenSource) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn from_config(config: &SecretsConfig) -> Self {
        Self::new(&config.kms_endpoint, AccessTokenSource::from_config(config))
    }

    fn decrypt_url(&self, key: &KeyIdentifier) -> String {
        format!("{}/v1/{}:decrypt", self.endpoint, key.resource_name())
    }
}

#[async_trait]
impl KeyManagementClient for GcpKmsClient {
    async fn decrypt(
        &self,
        key: &KeyIdentifier,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, DecryptionError> {
        let token = self.tokens.token(&self.http).await?;
        let url = self.decrypt_url(key);
        debug!(url = %url, ciphertext_bytes = ciphertext.len(), "Calling KMS decrypt");

        let res = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&DecryptRequest {
                ciphertext: STANDARD.encode(ciphertext),
            })
            .send()
            .await
            .map_err(|e| DecryptionError::Transport(e.without_url().to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<GoogleErrorEnvelope>(&body) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{code}: {}", envelope.error.message),
                    None => envelope.error.message,
                },
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            };
            warn!(key = %key, status = status.as_u16(), "KMS decrypt rejected");
            return Err(DecryptionError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: DecryptResponse = res
            .json()
            .await
            .map_err(|e| DecryptionError::MalformedResponse(e.without_url().to_string()))?;
        STANDARD
            .decode(body.plaintext.as_bytes())
            .map_err(|e| DecryptionError::MalformedResponse(format!("plaintext is not base64: {e}")))
    }
}
