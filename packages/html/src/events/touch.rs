use super::BaseEvent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchEventData {
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
    pub touches: Vec<TouchPointData>,
    #[serde(default)]
    pub target_touches: Vec<TouchPointData>,
    #[serde(default)]
    pub changed_touches: Vec<TouchPointData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPointData {
    pub identifier: i64,
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
    #[serde(default)]
    pub radius_x: f64,
    #[serde(default)]
    pub radius_y: f64,
    #[serde(default)]
    pub rotation_angle: f64,
    #[serde(default)]
    pub force: f64,
}
