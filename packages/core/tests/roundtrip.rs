//! Wire round-trips: a rendered model survives serialization, transport
//! framing, and application onto an empty mirror unchanged.

use lattice_core::prelude::*;
use lattice_core::{LayoutMessage, Model};
use lattice_hooks::use_state;
use lattice_html::{button, div, fragment, li, span, ul};

fn app(_: ()) -> Element {
    let count = use_state(|| 0);
    let n = count.get();

    Some(
        div()
            .attr("class_name", "dashboard")
            .attr("aria_label", "main view")
            .style([("background_color", "tan"), ("border-top-width", "1px")])
            .child(
                button()
                    .on_with_flags("click", true, false, move |_| count.set(n + 1))
                    .child("increment"),
            )
            .child(fragment([
                span().child("inside a").build(),
                span().child("fragment").build(),
            ]))
            .child(
                ul().children(
                    ["a", "b", "c"]
                        .into_iter()
                        .map(|key| li().key(key).child(key).build()),
                ),
            )
            .build(),
    )
}

#[test]
fn updates_survive_json_framing() {
    let mut layout = Layout::new(app);
    let update = layout.rebuild();

    let raw = update.clone().to_message().to_json();
    let parsed = LayoutMessage::parse(&raw).unwrap();
    assert_eq!(parsed, update.clone().to_message());

    // Serialization is deterministic.
    assert_eq!(raw, update.to_message().to_json());
}

#[test]
fn applying_to_an_empty_mirror_reproduces_the_model() {
    let mut layout = Layout::new(app);
    let update = layout.rebuild();

    let mut mirror = Model::default();
    mirror.apply(&update.path, update.model.clone()).unwrap();
    assert_eq!(mirror, update.model);

    // And the mirror re-serializes to the same JSON.
    assert_eq!(
        serde_json::to_string(&mirror).unwrap(),
        serde_json::to_string(&update.model).unwrap()
    );
}

#[test]
fn normalized_attributes_and_flags_reach_the_wire() {
    let mut layout = Layout::new(app);
    let update = layout.rebuild();
    let raw = update.to_message().to_json();

    assert!(raw.contains(r#""className":"dashboard""#));
    assert!(raw.contains(r#""aria-label":"main view""#));
    assert!(raw.contains(r#""backgroundColor":"tan""#));
    assert!(raw.contains(r#""borderTopWidth":"1px""#));
    assert!(raw.contains(r#""preventDefault":true"#));
    assert!(raw.contains(r#""tagName":"""#), "fragment nodes keep an empty tag");
}

#[test]
fn incremental_updates_splice_into_the_mirror() {
    fn stateful(_: ()) -> Element {
        let n = use_state(|| 0);
        let value = n.get();
        Some(
            div()
                .child(span().child("static"))
                .child(
                    button()
                        .on("click", move |_| n.set(value + 1))
                        .child(value.to_string()),
                )
                .build(),
        )
    }

    let mut layout = Layout::new(stateful);
    let initial = layout.rebuild();

    let mut mirror = Model::default();
    mirror.apply(&initial.path, initial.model).unwrap();

    let target = mirror
        .node_at("/children/1")
        .unwrap()
        .event_handlers
        .get("click")
        .unwrap()
        .target
        .clone();
    layout.deliver(lattice_core::LayoutEvent::new(target, Vec::new()));
    let update = layout.render_next().unwrap();

    mirror.apply(&update.path, update.model).unwrap();
    assert_eq!(mirror, layout.full_update().model);
}
