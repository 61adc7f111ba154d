//! Per-request webhook pipeline: validate, parse, dispatch.
//!
//! A failed reply only affects its own event; the rest of the batch is still
//! answered and the call as a whole succeeds.

use std::sync::Arc;

use linehook_core::{Credentials, MessageReplier, OutboundMessage, WebhookError};
use tracing::{debug, error, info, warn};

use crate::line_events::{MessageEvent, WebhookEvent};
use crate::line_receive::LineReceive;
use crate::line_send::MAX_REPLY_MESSAGES;

/// Decides what to say in reply to a message event.
pub trait Responder: Send + Sync {
    fn respond(&self, event: &MessageEvent) -> Vec<OutboundMessage>;
}

/// Answers every message with the same text.
pub struct FixedTextResponder {
    text: String,
}

impl FixedTextResponder {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Responder for FixedTextResponder {
    fn respond(&self, _event: &MessageEvent) -> Vec<OutboundMessage> {
        vec![OutboundMessage::text(&self.text)]
    }
}

/// Outcome of dispatching one batch of events.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub events: usize,
    pub replies_sent: usize,
    pub replies_failed: usize,
    /// Message events that could not be answered (no reply token, nothing to say).
    pub skipped: usize,
}

impl DispatchReport {
    /// True when at least one reply was attempted and none went through.
    pub fn all_replies_failed(&self) -> bool {
        self.replies_failed > 0 && self.replies_sent == 0
    }
}

/// Handles one inbound webhook call.
///
/// Only constructible from already bootstrapped [`Credentials`], so a handler
/// can never run against missing secrets.
pub struct WebhookHandler {
    credentials: Arc<Credentials>,
    replier: Arc<dyn MessageReplier>,
    responder: Arc<dyn Responder>,
}

impl WebhookHandler {
    pub fn new(
        credentials: Arc<Credentials>,
        replier: Arc<dyn MessageReplier>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            credentials,
            replier,
            responder,
        }
    }

    /// Validate `body` against `signature`, then answer its events in order.
    ///
    /// Errors are request-level rejections; reply failures are only counted
    /// in the returned report.
    pub async fn handle(
        &self,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<DispatchReport, WebhookError> {
        LineReceive::verify_signature(self.credentials.channel_secret(), signature, body)?;
        let events = LineReceive::parse_events(body)?;
        Ok(self.dispatch(&events).await)
    }

    async fn dispatch(&self, events: &[WebhookEvent]) -> DispatchReport {
        let mut report = DispatchReport {
            events: events.len(),
            ..DispatchReport::default()
        };

        for (index, event) in events.iter().enumerate() {
            match event {
                WebhookEvent::Message(message) => self.answer(index, message, &mut report).await,
                WebhookEvent::Follow(_)
                | WebhookEvent::Unfollow(_)
                | WebhookEvent::Join(_)
                | WebhookEvent::Leave(_)
                | WebhookEvent::MemberJoined(_)
                | WebhookEvent::MemberLeft(_)
                | WebhookEvent::Postback(_)
                | WebhookEvent::Beacon(_)
                | WebhookEvent::AccountLink(_)
                | WebhookEvent::Unsend(_)
                | WebhookEvent::VideoPlayComplete(_)
                | WebhookEvent::Unknown => {
                    debug!(index, kind = event.kind(), "Ignoring event");
                }
            }
        }

        if report.all_replies_failed() {
            error!(
                failed = report.replies_failed,
                "Every reply in the batch failed"
            );
        }
        info!(
            events = report.events,
            sent = report.replies_sent,
            failed = report.replies_failed,
            skipped = report.skipped,
            "Webhook batch processed"
        );
        report
    }

    async fn answer(&self, index: usize, event: &MessageEvent, report: &mut DispatchReport) {
        let Some(reply_token) = event.reply_token.as_deref() else {
            debug!(index, mode = ?event.mode, "Message event without reply token");
            report.skipped += 1;
            return;
        };

        let mut messages = self.responder.respond(event);
        if messages.is_empty() {
            report.skipped += 1;
            return;
        }
        if messages.len() > MAX_REPLY_MESSAGES {
            warn!(index, count = messages.len(), "Truncating reply to platform limit");
            messages.truncate(MAX_REPLY_MESSAGES);
        }

        match self.replier.reply(reply_token, &messages).await {
            Ok(()) => report.replies_sent += 1,
            Err(e) => {
                warn!(index, message_kind = event.message.kind(), error = %e, "Reply failed; continuing with next event");
                report.replies_failed += 1;
            }
        }
    }
}
