use super::BaseEvent;
use serde::{Deserialize, Serialize};

/// The serialized shape of a keyboard event.
///
/// `key` is the layout-aware value (`"a"`, `"Enter"`); `code` is the
/// physical key (`"KeyA"`), unaffected by layout or modifiers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    /// Standard/left/right/numpad, as the DOM encodes it.
    #[serde(default)]
    pub location: u8,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub is_composing: bool,
}
