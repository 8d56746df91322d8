//! Pointing-device event shapes: mouse, pointer, drag, and wheel.

use super::{BaseEvent, SerializedFile};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub button: i16,
    #[serde(default)]
    pub buttons: u16,
    #[serde(default)]
    pub client_x: f64,
    #[serde(default)]
    pub client_y: f64,
    #[serde(default)]
    pub page_x: f64,
    #[serde(default)]
    pub page_y: f64,
    #[serde(default)]
    pub screen_x: f64,
    #[serde(default)]
    pub screen_y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEventData {
    #[serde(flatten)]
    pub mouse: MouseEventData,
    #[serde(default)]
    pub pointer_id: i64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub tangential_pressure: f64,
    #[serde(default)]
    pub tilt_x: f64,
    #[serde(default)]
    pub tilt_y: f64,
    #[serde(default)]
    pub twist: f64,
    #[serde(default)]
    pub pointer_type: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Drag events carry the mouse shape plus a plain-data `dataTransfer`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEventData {
    #[serde(flatten)]
    pub mouse: MouseEventData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_transfer: Option<DataTransferData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTransferData {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub files: Vec<SerializedFile>,
    #[serde(default)]
    pub drop_effect: String,
    #[serde(default)]
    pub effect_allowed: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelEventData {
    #[serde(flatten)]
    pub mouse: MouseEventData,
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
    #[serde(default)]
    pub delta_z: f64,
    /// 0 = pixels, 1 = lines, 2 = pages.
    #[serde(default)]
    pub delta_mode: u8,
}
