//! Form and text-entry event shapes: input, submit, form-data, focus,
//! clipboard, and composition.

use super::BaseEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The inserted characters, when the input type carries any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default)]
    pub input_type: String,
    #[serde(default)]
    pub is_composing: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
}

/// Emitted when a form's entries are gathered; the entry list is translated
/// to a plain string map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDataEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub form_data: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Text content of the clipboard when the browser exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clipboard_data: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub data: String,
}
