//! Presentation event shapes: animation, transition, and generic UI.

use super::BaseEvent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub animation_name: String,
    #[serde(default)]
    pub elapsed_time: f64,
    #[serde(default)]
    pub pseudo_element: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub elapsed_time: f64,
    #[serde(default)]
    pub pseudo_element: String,
}

/// The catch-all shape for events without a richer category: scroll, load,
/// resize, and anything unrecognized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEventData {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(default)]
    pub detail: i64,
}
