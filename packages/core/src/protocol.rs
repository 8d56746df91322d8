//! The JSON message protocol between a layout and its client.
//!
//! Exactly two message kinds cross the transport: `layout-update` going out
//! and `layout-event` coming back. Anything else is a protocol failure and
//! is dropped by the renderer loop after logging.

use crate::error::ProtocolError;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tagged wire message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayoutMessage {
    /// Server to client: replace the subtree at `path` with `model`.
    #[serde(rename = "layout-update")]
    Update(LayoutUpdate),

    /// Client to server: invoke the handler registered under `target`.
    #[serde(rename = "layout-event")]
    Event(LayoutEvent),
}

impl LayoutMessage {
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> String {
        // Serialization of a message cannot fail: every field is a plain
        // data type with an infallible Serialize impl.
        serde_json::to_string(self).expect("layout messages serialize infallibly")
    }
}

/// One emitted diff: the subtree at `path` (empty string = the whole tree)
/// is replaced by `model`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutUpdate {
    pub path: String,
    pub model: Model,
}

impl LayoutUpdate {
    pub fn new(path: impl Into<String>, model: Model) -> Self {
        Self {
            path: path.into(),
            model,
        }
    }

    pub fn to_message(self) -> LayoutMessage {
        LayoutMessage::Update(self)
    }
}

/// One browser event routed back to a registered handler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutEvent {
    /// The handler's target ID as it appeared in the emitted model.
    pub target: String,
    /// Already-serialized event arguments.
    #[serde(default)]
    pub data: Vec<Value>,
}

impl LayoutEvent {
    pub fn new(target: impl Into<String>, data: Vec<Value>) -> Self {
        Self {
            target: target.into(),
            data,
        }
    }

    pub fn to_message(self) -> LayoutMessage {
        LayoutMessage::Event(self)
    }
}

/// How a disconnected client schedules its reconnect attempts. Part of the
/// bootstrap configuration the server hands to the client.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconnectOptions {
    /// Upper bound on the delay between attempts.
    pub max_interval_ms: u64,
    /// Give up after this many attempts.
    pub max_retries: u32,
    /// Multiplier applied to the delay after every attempt.
    pub backoff_rate: f64,
    /// Fraction of the delay randomized away in either direction, `0.0..=1.0`.
    pub jitter: f64,
}

impl Default for ReconnectOptions {
    fn default() -> Self {
        Self {
            max_interval_ms: 30_000,
            max_retries: 150,
            backoff_rate: 1.25,
            jitter: 0.25,
        }
    }
}
