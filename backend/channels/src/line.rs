/// LINE adapter — receives webhook events from LINE Messaging API.
/// Replies via the LINE Reply API.
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use linehook_config::LineConfig;
use linehook_core::{Credentials, WebhookError};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::line_receive::SIGNATURE_HEADER;
use crate::line_send::LineSend;
use crate::line_webhook::{FixedTextResponder, WebhookHandler};
use crate::ChannelAdapter;

pub struct LineAdapter {
    handler: Arc<WebhookHandler>,
    webhook_path: String,
}

impl LineAdapter {
    pub fn new(handler: WebhookHandler, webhook_path: impl Into<String>) -> Self {
        Self {
            handler: Arc::new(handler),
            webhook_path: webhook_path.into(),
        }
    }

    /// Wire the production reply client and fixed-text responder.
    pub fn from_credentials(
        credentials: Arc<Credentials>,
        config: &LineConfig,
        webhook_path: impl Into<String>,
    ) -> Result<Self> {
        let replier =
            LineSend::from_config(&credentials, config).context("Failed to build LINE reply client")?;
        let handler = WebhookHandler::new(
            credentials,
            Arc::new(replier),
            Arc::new(FixedTextResponder::new(&config.reply_text)),
        );
        Ok(Self::new(handler, webhook_path))
    }
}

/// Request-level rejection rendered as HTTP 400.
struct Rejection(WebhookError);

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = match &self.0 {
            WebhookError::Validation(e) => format!("invalid signature: {e}"),
            WebhookError::Parse(_) => "malformed webhook body".to_string(),
        };
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

async fn webhook_handler(
    State(handler): State<Arc<WebhookHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("line_webhook", %request_id, body_bytes = body.len());
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    match handler.handle(signature, &body).instrument(span.clone()).await {
        Ok(_report) => (StatusCode::OK, "ok").into_response(),
        Err(err) => {
            span.in_scope(|| warn!(error = %err, "[LINE] Rejected webhook request"));
            Rejection(err).into_response()
        }
    }
}

#[async_trait]
impl ChannelAdapter for LineAdapter {
    fn name(&self) -> &str {
        "line"
    }

    fn build_router(&self) -> Router {
        Router::new()
            .route(&self.webhook_path, post(webhook_handler))
            .with_state(self.handler.clone())
    }

    async fn start(&self) -> Result<()> {
        info!("[LINE] Adapter ready at {}", self.webhook_path);
        Ok(())
    }
}
