//! The batching law: within one synchronous event handler, any number of
//! writes to one state cell produce exactly one re-render, observing the
//! last plain value or the fold of updater functions.

mod common;

use common::{collect_text, find_target};
use lattice_core::prelude::*;
use lattice_hooks::use_state;
use lattice_core::LayoutEvent;
use lattice_html::button;

fn plain_counter(_: ()) -> Element {
    let count = use_state(|| 0);
    let n = count.get();

    Some(
        button()
            .on("click", move |_| {
                count.set(n + 1);
                count.set(n + 1);
                count.set(n + 1);
            })
            .child(n.to_string())
            .build(),
    )
}

fn updater_counter(_: ()) -> Element {
    let count = use_state(|| 0);
    let n = count.get();

    Some(
        button()
            .on("click", move |_| {
                count.modify(|n| n + 1);
                count.modify(|n| n + 1);
                count.modify(|n| n + 1);
            })
            .child(n.to_string())
            .build(),
    )
}

fn click(layout: &mut Layout, target: &str) {
    layout.deliver(LayoutEvent::new(target, Vec::new()));
}

#[test]
fn plain_sets_are_last_write_wins() {
    let mut layout = Layout::new(plain_counter);
    let initial = layout.rebuild();
    assert_eq!(collect_text(&initial.model), "0");
    let target = find_target(&initial.model, "click").unwrap();

    let mut labels = vec![collect_text(&initial.model)];
    for _ in 0..3 {
        click(&mut layout, &target);
        let update = layout.render_next().expect("one render per event");
        labels.push(collect_text(&update.model));
        // one event, one render: nothing further is pending
        assert!(layout.render_next().is_none());
    }

    assert_eq!(labels, ["0", "1", "2", "3"]);
}

#[test]
fn updater_functions_fold_in_call_order() {
    let mut layout = Layout::new(updater_counter);
    let initial = layout.rebuild();
    let target = find_target(&initial.model, "click").unwrap();

    let mut labels = vec![collect_text(&initial.model)];
    for _ in 0..3 {
        click(&mut layout, &target);
        let update = layout.render_next().expect("one render per event");
        labels.push(collect_text(&update.model));
        assert!(layout.render_next().is_none());
    }

    assert_eq!(labels, ["0", "3", "6", "9"]);
}

#[test]
fn setting_an_equal_value_is_a_no_op() {
    fn app(_: ()) -> Element {
        let count = use_state(|| 5);
        let n = count.get();
        Some(
            button()
                .on("click", move |_| count.set(5))
                .child(n.to_string())
                .build(),
        )
    }

    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    let target = find_target(&initial.model, "click").unwrap();

    click(&mut layout, &target);
    assert!(layout.render_next().is_none(), "equal write must not re-render");
}
