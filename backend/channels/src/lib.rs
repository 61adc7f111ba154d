use async_trait::async_trait;

// --------------- LINE Messaging API ---------------
pub mod line;
pub mod line_events;
pub mod line_receive;
pub mod line_send;
pub mod line_webhook;

pub use line::LineAdapter;
pub use line_webhook::{DispatchReport, FixedTextResponder, Responder, WebhookHandler};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Build the Axum sub-router for inbound webhook endpoints.
    fn build_router(&self) -> axum::Router {
        axum::Router::new()
    }

    /// Called once the server is about to accept traffic.
    async fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
