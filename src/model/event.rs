//! Raw OneBot v11 payloads and event classification.
//!
//! # Classification
//!
//! The platform binding hands over one raw payload per inbound occurrence.
//! [`classify`] inspects `post_type` and friends and maps the payload to a
//! semantic [`InboundEvent`]:
//!
//! ```text
//! RawEvent
//! ├── post_type = "notice"  + poke shape          → Poke
//! ├── post_type = "message" + message_type="group" → GroupMessage
//! └── anything else (incl. missing group_id)       → Unclassified
//! ```
//!
//! Three wire shapes announce a poke notification, depending on the
//! platform implementation:
//!
//! 1. `notice_type = "notify"` + `sub_type = "poke"` (OneBot v11 standard)
//! 2. `notice_type = "poke"`
//! 3. `notice_type = "notify"` + `notify_type = "poke"`
//!
//! Classification is pure: whether a poke actually targets the bot is
//! decided by the poke handler, not here.

use serde::Deserialize;
use serde_json::Value;

use super::message;

/// A raw inbound payload as delivered by the platform binding.
///
/// Every field is optional; absent discriminators simply classify the
/// event as [`InboundEvent::Unclassified`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    /// Top-level event family ("message", "notice", "request", "meta_event").
    #[serde(default)]
    pub post_type: Option<String>,
    /// Message family discriminator ("private", "group").
    #[serde(default)]
    pub message_type: Option<String>,
    /// Notice family discriminator ("notify", "poke", ...).
    #[serde(default)]
    pub notice_type: Option<String>,
    /// Notice sub-type ("poke", "lucky_king", ...).
    #[serde(default)]
    pub sub_type: Option<String>,
    /// Alternate notify discriminator used by some implementations.
    #[serde(default)]
    pub notify_type: Option<String>,
    /// Group the event happened in. Absent for private events.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// User targeted by a poke.
    #[serde(default)]
    pub target_id: Option<i64>,
    /// Receiving bot's own ID, as echoed in the payload.
    #[serde(default)]
    pub self_id: Option<i64>,
    /// Platform hint that the message is addressed to the bot.
    #[serde(default)]
    pub to_me: Option<bool>,
    /// Message content as an array of segments.
    #[serde(default)]
    pub message: Value,
    /// Pre-extracted message string (CQ-code form), used when no
    /// structured segments are present.
    #[serde(default)]
    pub raw_message: Option<String>,
}

impl RawEvent {
    /// Parses a raw event from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Parses a raw event from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Whether the notice discriminators match any accepted poke shape.
    ///
    /// Deliberately ignores `post_type`; [`classify`] checks that first,
    /// so a message payload carrying poke fields never slips through.
    fn has_poke_shape(&self) -> bool {
        let notice = self.notice_type.as_deref();
        (notice == Some("notify") && self.sub_type.as_deref() == Some("poke"))
            || notice == Some("poke")
            || (notice == Some("notify") && self.notify_type.as_deref() == Some("poke"))
    }

    /// Display text of the message content.
    ///
    /// Prefers structured segments; falls back to `raw_message` when the
    /// payload carries no segment array.
    fn text(&self) -> String {
        if self.message.is_array() {
            message::display_text(&self.message)
        } else {
            self.raw_message.clone().unwrap_or_default()
        }
    }
}

/// A classified inbound event. Transient — constructed once per payload,
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Someone poked someone in a group.
    Poke {
        /// Group the poke happened in.
        group_id: i64,
        /// Poked user, when the platform reports one.
        target_id: Option<i64>,
    },
    /// A message was sent in a group.
    GroupMessage {
        /// Group the message was sent in.
        group_id: i64,
        /// Display text of the message.
        text: String,
        /// Whether the bot is @-mentioned or the platform flagged the
        /// message as addressed to it.
        mentions_bot: bool,
        /// Raw segment array, kept for mention stripping.
        message: Value,
    },
    /// Anything the responder does not react to.
    Unclassified,
}

/// Maps a raw payload to a semantic event.
///
/// Pure function of the payload and the bot's own ID. Events without a
/// `group_id` are always [`InboundEvent::Unclassified`] — this responder
/// only reacts inside groups.
pub fn classify(raw: &RawEvent, self_id: i64) -> InboundEvent {
    let Some(group_id) = raw.group_id else {
        return InboundEvent::Unclassified;
    };

    match raw.post_type.as_deref() {
        Some("notice") if raw.has_poke_shape() => InboundEvent::Poke {
            group_id,
            target_id: raw.target_id,
        },
        Some("message") if raw.message_type.as_deref() == Some("group") => {
            InboundEvent::GroupMessage {
                group_id,
                text: raw.text(),
                mentions_bot: raw.to_me == Some(true)
                    || message::mentions(&raw.message, self_id),
                message: raw.message.clone(),
            }
        }
        _ => InboundEvent::Unclassified,
    }
}
