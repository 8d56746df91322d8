//! Sensor and controller event shapes: device motion, device orientation,
//! and gamepads.

use super::BaseEvent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionVector {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationRateData {
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMotionEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<MotionVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_including_gravity: Option<MotionVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_rate: Option<RotationRateData>,
    #[serde(default)]
    pub interval: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOrientationEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub absolute: bool,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamepadEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    pub gamepad: GamepadData,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamepadData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub mapping: String,
    /// Button pressure values in declaration order.
    #[serde(default)]
    pub buttons: Vec<f64>,
    #[serde(default)]
    pub axes: Vec<f64>,
}
