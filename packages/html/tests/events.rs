//! Wire shapes of serialized events.

use lattice_html::events::{
    category_of, BaseEvent, EventCategory, EventData, EventTargetInfo, KeyboardEventData,
    SerializedFile, TargetExtras,
};
use serde_json::json;

#[test]
fn event_names_map_to_their_categories() {
    assert_eq!(category_of("click"), EventCategory::Mouse);
    assert_eq!(category_of("pointerdown"), EventCategory::Pointer);
    assert_eq!(category_of("keyup"), EventCategory::Keyboard);
    assert_eq!(category_of("animationend"), EventCategory::Animation);
    assert_eq!(category_of("formdata"), EventCategory::FormData);
    assert_eq!(category_of("devicemotion"), EventCategory::DeviceMotion);
    // Unknown names fall back to the UI shape instead of failing.
    assert_eq!(category_of("load"), EventCategory::Ui);
}

#[test]
fn keyboard_events_serialize_camel_case() {
    let event = KeyboardEventData {
        base: BaseEvent {
            event_type: "keydown".to_string(),
            time_stamp: 12.5,
            bubbles: true,
            is_trusted: true,
            ..Default::default()
        },
        key: "a".to_string(),
        code: "KeyA".to_string(),
        shift_key: true,
        ..Default::default()
    };

    let raw = serde_json::to_string(&event).unwrap();
    assert!(raw.contains(r#""type":"keydown""#));
    assert!(raw.contains(r#""timeStamp":12.5"#));
    assert!(raw.contains(r#""shiftKey":true"#));
    assert!(raw.contains(r#""isTrusted":true"#));

    let back: KeyboardEventData = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, event);
}

#[test]
fn decode_picks_the_category_shape() {
    let value = json!({
        "type": "click",
        "timeStamp": 3.0,
        "bubbles": true,
        "composed": false,
        "defaultPrevented": false,
        "eventPhase": 2,
        "isTrusted": true,
        "clientX": 10.0,
        "clientY": 20.0,
        "button": 0,
    });

    let decoded = EventData::decode("click", &value).unwrap();
    let EventData::Mouse(mouse) = decoded else {
        panic!("click decodes as a mouse event");
    };
    assert_eq!(mouse.client_x, 10.0);
    assert_eq!(mouse.base.event_type, "click");
}

#[test]
fn input_targets_carry_their_value() {
    let target: EventTargetInfo = serde_json::from_value(json!({
        "tagName": "INPUT",
        "value": "typed text",
        "checked": false,
    }))
    .unwrap();

    let TargetExtras::Input { value, checked } = target.extra else {
        panic!("input target decodes the Input extras");
    };
    assert_eq!(value, "typed text");
    assert_eq!(checked, Some(false));
}

#[test]
fn file_inputs_translate_files_to_plain_data() {
    let target: EventTargetInfo = serde_json::from_value(json!({
        "tagName": "INPUT",
        "value": "",
        "files": [
            { "name": "photo.png", "size": 1024, "type": "image/png", "lastModified": 1700000000 },
        ],
    }))
    .unwrap();

    let TargetExtras::FileInput { files, .. } = target.extra else {
        panic!("file input decodes the FileInput extras");
    };
    assert_eq!(
        files,
        vec![SerializedFile {
            name: "photo.png".to_string(),
            size: 1024,
            mime_type: "image/png".to_string(),
            last_modified: 1_700_000_000,
        }]
    );
}

#[test]
fn plain_targets_need_no_extras() {
    let target: EventTargetInfo = serde_json::from_value(json!({
        "tagName": "DIV",
    }))
    .unwrap();
    assert_eq!(target.extra, TargetExtras::Plain {});
}
