//! Canonical representation of one inbound Telegram update.

use serde::{Deserialize, Serialize};

const UPDATE_KINDS: &[&str] = &[
    "message",
    "edited_message",
    "channel_post",
    "edited_channel_post",
    "inline_query",
    "chosen_inline_result",
    "callback_query",
    "shipping_query",
    "pre_checkout_query",
    "poll",
    "poll_answer",
    "my_chat_member",
    "chat_member",
    "chat_join_request",
];

/// Parsed update. Only `update_id` is interpreted here; every other field is
/// carried through untouched for the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Telegram update identifier.
    pub update_id: i64,
    /// Remaining payload fields.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Update {
    /// Parse a raw request body. Fails on malformed JSON, non-object bodies, or
    /// a missing/non-integer `update_id`.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// First known payload field present (`message`, `callback_query`, ...).
    pub fn kind(&self) -> Option<&'static str> {
        UPDATE_KINDS
            .iter()
            .copied()
            .find(|kind| self.payload.contains_key(*kind))
    }

    /// Chat id of the carried message, when there is one.
    pub fn chat_id(&self) -> Option<i64> {
        let kind = self.kind()?;
        self.payload
            .get(kind)
            .and_then(|v| v.get("chat"))
            .and_then(|c| c.get("id"))
            .and_then(serde_json::Value::as_i64)
    }
}
