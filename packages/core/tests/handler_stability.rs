//! Handler target IDs: stable while an element stays mounted, released at
//! unmount, with late events dropped silently.

mod common;

use common::{collect_text, find_target};
use lattice_core::prelude::*;
use lattice_core::LayoutEvent;
use lattice_hooks::use_state;
use lattice_html::{button, div};

fn app(_: ()) -> Element {
    let count = use_state(|| 0);
    let n = count.get();

    let body = (n < 3).then(|| {
        button()
            .on("click", move |_| count.set(n + 1))
            .child(n.to_string())
    });

    Some(div().maybe_child(body).build())
}

#[test]
fn retained_elements_keep_their_target_ids() {
    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    let first = find_target(&initial.model, "click").unwrap();

    layout.deliver(LayoutEvent::new(&first, Vec::new()));
    let update = layout.render_next().unwrap();
    let second = find_target(&update.model, "click").unwrap();

    assert_eq!(first, second);
    assert_eq!(collect_text(&update.model), "1");
}

#[test]
fn unmounting_releases_handler_registrations() {
    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    assert_eq!(layout.registered_handlers(), 1);
    let target = find_target(&initial.model, "click").unwrap();

    // Three clicks: the last render drops the button entirely.
    for _ in 0..3 {
        layout.deliver(LayoutEvent::new(&target, Vec::new()));
        layout.render_next().unwrap();
    }

    assert!(find_target(&layout.full_update().model, "click").is_none());
    assert_eq!(layout.registered_handlers(), 0);
}

#[test]
fn late_events_for_released_targets_are_dropped() {
    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    let target = find_target(&initial.model, "click").unwrap();

    for _ in 0..3 {
        layout.deliver(LayoutEvent::new(&target, Vec::new()));
        layout.render_next().unwrap();
    }

    // The element is gone; its target must be too. Delivery neither panics
    // nor schedules work.
    layout.deliver(LayoutEvent::new(&target, Vec::new()));
    assert!(layout.render_next().is_none());

    // Garbage targets take the same path.
    layout.deliver(LayoutEvent::new("not-a-target", Vec::new()));
    assert!(layout.render_next().is_none());
}
