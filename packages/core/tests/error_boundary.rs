//! Containment of render failures and hook misuse: the offending subtree is
//! replaced, the rest of the layout keeps working.

mod common;

use common::{collect_text, find_target};
use lattice_core::prelude::*;
use lattice_core::LayoutEvent;
use lattice_hooks::use_state;
use lattice_html::{div, span};

#[derive(Clone, PartialEq)]
struct FragileProps {
    explode: bool,
}

fn fragile(props: FragileProps) -> Element {
    if props.explode {
        panic!("boom: secret database url");
    }
    Some(span().child("ok").build())
}

fn app(_: ()) -> Element {
    let explode = use_state(|| false);
    let armed = explode.get();

    Some(
        div()
            .on("click", {
                let explode = explode.clone();
                move |_| explode.set(true)
            })
            .on("dblclick", move |_| explode.set(false))
            .child(component(fragile, FragileProps { explode: armed }))
            .child(span().child("sibling"))
            .build(),
    )
}

#[test]
fn render_failure_becomes_an_error_node_in_debug_mode() {
    let mut layout = Layout::new(app).with_debug_mode(true);
    let initial = layout.rebuild();
    assert_eq!(collect_text(&initial.model), "oksibling");

    let target = find_target(&initial.model, "click").unwrap();
    layout.deliver(LayoutEvent::new(&target, Vec::new()));
    let update = layout.render_next().unwrap();

    let failed = update.model.node_at("/children/0").unwrap();
    assert_eq!(failed.tag_name, "");
    assert!(failed.error.as_deref().unwrap().contains("boom"));

    // The failure is contained: the sibling is still there.
    assert_eq!(collect_text(&update.model), "sibling");
}

#[test]
fn error_messages_are_hidden_outside_debug_mode() {
    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    let target = find_target(&initial.model, "click").unwrap();

    layout.deliver(LayoutEvent::new(&target, Vec::new()));
    let update = layout.render_next().unwrap();

    let failed = update.model.node_at("/children/0").unwrap();
    assert_eq!(failed.error.as_deref(), Some(""));
    assert!(!update.to_message().to_json().contains("secret"));
}

#[test]
fn a_failed_component_recovers_on_the_next_good_render() {
    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    let arm = find_target(&initial.model, "click").unwrap();
    let disarm = find_target(&initial.model, "dblclick").unwrap();

    layout.deliver(LayoutEvent::new(&arm, Vec::new()));
    layout.render_next().unwrap();

    layout.deliver(LayoutEvent::new(&disarm, Vec::new()));
    let update = layout.render_next().unwrap();
    assert_eq!(collect_text(&update.model), "oksibling");
}

fn drifting(props: FragileProps) -> Element {
    // Conditional hook use: slot 0 changes type between renders.
    if !props.explode {
        let _count = use_state(|| 0);
    }
    let _label = use_state(|| "x".to_string());
    Some(span().child("drift").build())
}

fn drifting_app(_: ()) -> Element {
    let explode = use_state(|| false);
    let armed = explode.get();

    Some(
        div()
            .on("click", move |_| explode.set(true))
            .child(component(drifting, FragileProps { explode: armed }))
            .child(span().child("sibling"))
            .build(),
    )
}

#[test]
fn hook_order_violation_yields_an_empty_node_and_the_layout_continues() {
    let mut layout = Layout::new(drifting_app).with_debug_mode(true);
    let initial = layout.rebuild();
    assert_eq!(collect_text(&initial.model), "driftsibling");

    let target = find_target(&initial.model, "click").unwrap();
    layout.deliver(LayoutEvent::new(&target, Vec::new()));
    let update = layout.render_next().unwrap();

    let violated = update.model.node_at("/children/0").unwrap();
    assert_eq!(violated.tag_name, "");
    assert!(violated.error.is_none(), "hook misuse is not an error node");
    assert!(violated.children.is_empty());
    assert_eq!(collect_text(&update.model), "sibling");
}
