//! Turning delivered browser events into `layout-event` messages.

use lattice_core::{EventTarget, LayoutEvent, LayoutMessage};
use lattice_html::events::EventData;
use serde_json::Value;

/// Synthetic transport notifications. Never transmitted; the transport
/// layer emits them locally to the reconciler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    Open,
    Close,
}

/// Build the wire message for one serialized event aimed at a registered
/// handler.
pub fn event_message(descriptor: &EventTarget, data: Vec<Value>) -> LayoutMessage {
    LayoutEvent::new(descriptor.target.clone(), data).to_message()
}

/// Convenience wrapper for typed event records.
pub fn typed_event_message(
    descriptor: &EventTarget,
    data: &EventData,
) -> Result<LayoutMessage, serde_json::Error> {
    let value = match data {
        EventData::Animation(inner) => serde_json::to_value(inner)?,
        EventData::Clipboard(inner) => serde_json::to_value(inner)?,
        EventData::Composition(inner) => serde_json::to_value(inner)?,
        EventData::DeviceMotion(inner) => serde_json::to_value(inner)?,
        EventData::DeviceOrientation(inner) => serde_json::to_value(inner)?,
        EventData::Drag(inner) => serde_json::to_value(inner)?,
        EventData::Focus(inner) => serde_json::to_value(inner)?,
        EventData::FormData(inner) => serde_json::to_value(inner)?,
        EventData::Gamepad(inner) => serde_json::to_value(inner)?,
        EventData::Input(inner) => serde_json::to_value(inner)?,
        EventData::Keyboard(inner) => serde_json::to_value(inner)?,
        EventData::Mouse(inner) => serde_json::to_value(inner)?,
        EventData::Pointer(inner) => serde_json::to_value(inner)?,
        EventData::Submit(inner) => serde_json::to_value(inner)?,
        EventData::Touch(inner) => serde_json::to_value(inner)?,
        EventData::Transition(inner) => serde_json::to_value(inner)?,
        EventData::Ui(inner) => serde_json::to_value(inner)?,
        EventData::Wheel(inner) => serde_json::to_value(inner)?,
    };
    Ok(event_message(descriptor, vec![value]))
}
