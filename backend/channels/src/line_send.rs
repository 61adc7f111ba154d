//! LINE Senders
//!
//! Sends reply messages through the LINE Messaging API reply endpoint.

use std::time::Duration;

use async_trait::async_trait;
use linehook_config::LineConfig;
use linehook_core::{Credentials, MessageReplier, OutboundMessage, ReplyError};
use linehook_logging::redact_sensitive_data;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The reply endpoint accepts at most this many messages per call.
pub const MAX_REPLY_MESSAGES: usize = 5;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutboundMessage],
}

#[derive(Deserialize)]
struct LineApiError {
    message: String,
}

/// Reply client authenticated with the channel access token.
pub struct LineSend {
    http: Client,
    api_base: String,
    access_token: String,
}

impl LineSend {
    pub fn new(
        api_base: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    pub fn from_config(credentials: &Credentials, config: &LineConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.api_base,
            credentials.channel_access_token(),
            Duration::from_secs(config.reply_timeout_secs),
        )
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.api_base)
    }
}

#[async_trait]
impl MessageReplier for LineSend {
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), ReplyError> {
        let res = self
            .http
            .post(self.reply_url())
            .bearer_auth(&self.access_token)
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReplyError::Timeout
                } else {
                    ReplyError::Transport(e.without_url().to_string())
                }
            })?;

        let status = res.status();
        if status.is_success() {
            debug!(messages = messages.len(), "Reply delivered");
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<LineApiError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(ReplyError::Rejected {
            status: status.as_u16(),
            message: redact_sensitive_data(&message),
        })
    }
}
