//! LINE webhook wire types.
//!
//! Event and message kinds are closed enums tagged by the JSON `type` field.
//! Kinds the platform adds later land in the `Unknown` variants instead of
//! failing the whole request.

use serde::Deserialize;

/// Request body posted by the LINE platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Bot user ID the events are addressed to.
    pub destination: Option<String>,
    /// Events in delivery order. Empty for the console's verify request.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    Follow(EventContext),
    Unfollow(EventContext),
    Join(EventContext),
    Leave(EventContext),
    MemberJoined(EventContext),
    MemberLeft(EventContext),
    Postback(PostbackEvent),
    Beacon(EventContext),
    AccountLink(EventContext),
    Unsend(EventContext),
    VideoPlayComplete(EventContext),
    #[serde(other)]
    Unknown,
}

impl WebhookEvent {
    /// Wire name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Follow(_) => "follow",
            Self::Unfollow(_) => "unfollow",
            Self::Join(_) => "join",
            Self::Leave(_) => "leave",
            Self::MemberJoined(_) => "memberJoined",
            Self::MemberLeft(_) => "memberLeft",
            Self::Postback(_) => "postback",
            Self::Beacon(_) => "beacon",
            Self::AccountLink(_) => "accountLink",
            Self::Unsend(_) => "unsend",
            Self::VideoPlayComplete(_) => "videoPlayComplete",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Absent for events delivered while the channel is in standby mode.
    pub reply_token: Option<String>,
    pub message: MessageContent,
    pub source: Option<Source>,
    pub timestamp: Option<i64>,
    pub webhook_event_id: Option<String>,
    pub delivery_context: Option<DeliveryContext>,
    pub mode: Option<String>,
}

/// Fields shared by the event kinds this bot does not act on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub reply_token: Option<String>,
    pub source: Option<Source>,
    pub timestamp: Option<i64>,
    pub webhook_event_id: Option<String>,
    pub delivery_context: Option<DeliveryContext>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackEvent {
    pub reply_token: Option<String>,
    pub source: Option<Source>,
    pub timestamp: Option<i64>,
    pub webhook_event_id: Option<String>,
    pub postback: Postback,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Postback {
    pub data: String,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    pub is_redelivery: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Source {
    #[serde(rename_all = "camelCase")]
    User { user_id: Option<String> },
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        room_id: String,
        user_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text {
        id: String,
        text: String,
    },
    Image {
        id: String,
    },
    Video {
        id: String,
    },
    Audio {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    File {
        id: String,
        file_name: Option<String>,
    },
    Location {
        id: String,
        title: Option<String>,
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    #[serde(rename_all = "camelCase")]
    Sticker {
        id: String,
        package_id: String,
        sticker_id: String,
    },
    #[serde(other)]
    Unknown,
}

impl MessageContent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Audio { .. } => "audio",
            Self::File { .. } => "file",
            Self::Location { .. } => "location",
            Self::Sticker { .. } => "sticker",
            Self::Unknown => "unknown",
        }
    }
}
