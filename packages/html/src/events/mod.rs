//! The closed wire shapes of serialized DOM events.
//!
//! The client serializes every delivered browser event into one of these
//! records before sending it inside a `layout-event` message. Each record
//! carries the common envelope ([`BaseEvent`]) plus its category's fields;
//! the target triple is a sub-record with element-class-specific extras.
//! Non-serializable browser values are dropped or translated to plain data
//! (file lists become `[{name, size, type, lastModified}]`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod animation;
mod device;
mod form;
mod keyboard;
mod mouse;
mod touch;

pub use animation::*;
pub use device::*;
pub use form::*;
pub use keyboard::*;
pub use mouse::*;
pub use touch::*;

/// Fields shared by every serialized event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub time_stamp: f64,
    #[serde(default)]
    pub bubbles: bool,
    #[serde(default)]
    pub composed: bool,
    #[serde(default)]
    pub default_prevented: bool,
    #[serde(default)]
    pub event_phase: u8,
    #[serde(default)]
    pub is_trusted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<EventTargetInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_target: Option<EventTargetInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_target: Option<EventTargetInfo>,
    /// `window.getSelection()` captured at event time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionSnapshot>,
}

/// The serialized form of an event's target element.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetInfo {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_client_rect: Option<DomRect>,
    #[serde(flatten)]
    pub extra: TargetExtras,
}

/// Element-class-specific extras on a serialized target, discriminated by
/// the element's tag: forms report their field values, file inputs their
/// file metadata, value-carrying inputs their value, media elements their
/// playback position, anchors their destination.
///
/// Serialized untagged; variants are ordered most-specific-first so
/// deserialization picks the right one back out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, rename_all = "camelCase")]
pub enum TargetExtras {
    Form {
        elements: Vec<FormFieldInfo>,
    },
    FileInput {
        files: Vec<SerializedFile>,
        value: String,
    },
    Input {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    Media {
        #[serde(rename = "currentTime")]
        current_time: f64,
        #[serde(default)]
        paused: bool,
    },
    Anchor {
        href: String,
    },
    Plain {},
}

impl Default for TargetExtras {
    fn default() -> Self {
        TargetExtras::Plain {}
    }
}

/// One control inside a serialized `<form>` target.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldInfo {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

/// Plain-data translation of a browser `File`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub last_modified: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The window selection at the moment the event fired.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    pub anchor_offset: u32,
    pub focus_offset: u32,
    pub is_collapsed: bool,
    #[serde(default)]
    pub text: String,
}

/// The event categories with a built-in serializer on the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Animation,
    Clipboard,
    Composition,
    DeviceMotion,
    DeviceOrientation,
    Drag,
    Focus,
    FormData,
    Gamepad,
    Input,
    Keyboard,
    Mouse,
    Pointer,
    Submit,
    Touch,
    Transition,
    Ui,
    Wheel,
}

/// Look up the category a DOM event name serializes under. Unknown names
/// fall back to the UI shape.
pub fn category_of(event: &str) -> EventCategory {
    use EventCategory::*;
    match event {
        "animationstart" | "animationend" | "animationiteration" | "animationcancel" => Animation,
        "copy" | "cut" | "paste" => Clipboard,
        "compositionstart" | "compositionupdate" | "compositionend" => Composition,
        "devicemotion" => DeviceMotion,
        "deviceorientation" | "deviceorientationabsolute" => DeviceOrientation,
        "drag" | "dragend" | "dragenter" | "dragexit" | "dragleave" | "dragover" | "dragstart"
        | "drop" => Drag,
        "focus" | "blur" | "focusin" | "focusout" => Focus,
        "formdata" => FormData,
        "gamepadconnected" | "gamepaddisconnected" => Gamepad,
        "input" | "beforeinput" | "change" | "invalid" | "reset" | "select" => Input,
        "keydown" | "keypress" | "keyup" => Keyboard,
        "click" | "dblclick" | "mousedown" | "mouseenter" | "mouseleave" | "mousemove"
        | "mouseout" | "mouseover" | "mouseup" | "contextmenu" | "auxclick" => Mouse,
        "pointerdown" | "pointermove" | "pointerup" | "pointercancel" | "pointerenter"
        | "pointerleave" | "pointerover" | "pointerout" | "gotpointercapture"
        | "lostpointercapture" => Pointer,
        "submit" => Submit,
        "touchstart" | "touchmove" | "touchend" | "touchcancel" => Touch,
        "transitionstart" | "transitionend" | "transitionrun" | "transitioncancel" => Transition,
        "wheel" => Wheel,
        _ => Ui,
    }
}

/// A decoded serialized event, discriminated by category.
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Animation(AnimationEventData),
    Clipboard(ClipboardEventData),
    Composition(CompositionEventData),
    DeviceMotion(DeviceMotionEventData),
    DeviceOrientation(DeviceOrientationEventData),
    Drag(DragEventData),
    Focus(FocusEventData),
    FormData(FormDataEventData),
    Gamepad(GamepadEventData),
    Input(InputEventData),
    Keyboard(KeyboardEventData),
    Mouse(MouseEventData),
    Pointer(PointerEventData),
    Submit(SubmitEventData),
    Touch(TouchEventData),
    Transition(TransitionEventData),
    Ui(UiEventData),
    Wheel(WheelEventData),
}

impl EventData {
    /// Decode a `layout-event` argument into the typed record for the given
    /// event name.
    pub fn decode(event: &str, value: &Value) -> Result<Self, serde_json::Error> {
        use EventCategory as C;
        Ok(match category_of(event) {
            C::Animation => EventData::Animation(serde_json::from_value(value.clone())?),
            C::Clipboard => EventData::Clipboard(serde_json::from_value(value.clone())?),
            C::Composition => EventData::Composition(serde_json::from_value(value.clone())?),
            C::DeviceMotion => EventData::DeviceMotion(serde_json::from_value(value.clone())?),
            C::DeviceOrientation => {
                EventData::DeviceOrientation(serde_json::from_value(value.clone())?)
            }
            C::Drag => EventData::Drag(serde_json::from_value(value.clone())?),
            C::Focus => EventData::Focus(serde_json::from_value(value.clone())?),
            C::FormData => EventData::FormData(serde_json::from_value(value.clone())?),
            C::Gamepad => EventData::Gamepad(serde_json::from_value(value.clone())?),
            C::Input => EventData::Input(serde_json::from_value(value.clone())?),
            C::Keyboard => EventData::Keyboard(serde_json::from_value(value.clone())?),
            C::Mouse => EventData::Mouse(serde_json::from_value(value.clone())?),
            C::Pointer => EventData::Pointer(serde_json::from_value(value.clone())?),
            C::Submit => EventData::Submit(serde_json::from_value(value.clone())?),
            C::Touch => EventData::Touch(serde_json::from_value(value.clone())?),
            C::Transition => EventData::Transition(serde_json::from_value(value.clone())?),
            C::Ui => EventData::Ui(serde_json::from_value(value.clone())?),
            C::Wheel => EventData::Wheel(serde_json::from_value(value.clone())?),
        })
    }

    pub fn base(&self) -> &BaseEvent {
        match self {
            EventData::Animation(data) => &data.base,
            EventData::Clipboard(data) => &data.base,
            EventData::Composition(data) => &data.base,
            EventData::DeviceMotion(data) => &data.base,
            EventData::DeviceOrientation(data) => &data.base,
            EventData::Drag(data) => &data.mouse.base,
            EventData::Focus(data) => &data.base,
            EventData::FormData(data) => &data.base,
            EventData::Gamepad(data) => &data.base,
            EventData::Input(data) => &data.base,
            EventData::Keyboard(data) => &data.base,
            EventData::Mouse(data) => &data.base,
            EventData::Pointer(data) => &data.mouse.base,
            EventData::Submit(data) => &data.base,
            EventData::Touch(data) => &data.base,
            EventData::Transition(data) => &data.base,
            EventData::Ui(data) => &data.base,
            EventData::Wheel(data) => &data.mouse.base,
        }
    }
}
