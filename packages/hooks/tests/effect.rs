//! `use_effect` semantics: dependency gating and at-most-once cleanup.

use lattice_core::prelude::*;
use lattice_core::{LayoutEvent, Model, ModelChild};
use lattice_hooks::{use_effect, use_effect_with_deps, use_state};
use lattice_html::div;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Clone)]
struct LogProps {
    log: Log,
}

impl PartialEq for LogProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.log, &other.log)
    }
}

fn first_click_target(model: &Model) -> Option<String> {
    if let Some(descriptor) = model.event_handlers.get("click") {
        return Some(descriptor.target.clone());
    }
    model.children.iter().find_map(|child| match child {
        ModelChild::Node(node) => first_click_target(node),
        ModelChild::Text(_) => None,
    })
}

#[test]
fn undepped_effects_run_after_every_render() {
    fn app(props: LogProps) -> Element {
        let generation = use_state(|| 0u32);
        let n = generation.get();
        let log = props.log.clone();
        use_effect(move || {
            log.borrow_mut().push(format!("ran {n}"));
            || {}
        });

        Some(
            div()
                .on("click", move |_| generation.set(n + 1))
                .child(n.to_string())
                .build(),
        )
    }

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut layout = Layout::new_with_props(app, LogProps { log: log.clone() });
    let initial = layout.rebuild();
    let target = first_click_target(&initial.model).unwrap();

    layout.deliver(LayoutEvent::new(&target, Vec::new()));
    layout.render_next().unwrap();

    assert_eq!(*log.borrow(), ["ran 0", "ran 1"]);
}

#[test]
fn depped_effects_skip_renders_with_equal_deps() {
    fn app(props: LogProps) -> Element {
        let generation = use_state(|| 0u32);
        let n = generation.get();
        let bucket = n / 2;
        let log = props.log.clone();
        use_effect_with_deps(
            move |bucket| {
                log.borrow_mut().push(format!("bucket {bucket}"));
                || {}
            },
            bucket,
        );

        Some(
            div()
                .on("click", move |_| generation.set(n + 1))
                .child(n.to_string())
                .build(),
        )
    }

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut layout = Layout::new_with_props(app, LogProps { log: log.clone() });
    let initial = layout.rebuild();
    let target = first_click_target(&initial.model).unwrap();

    for _ in 0..3 {
        layout.deliver(LayoutEvent::new(&target, Vec::new()));
        layout.render_next().unwrap();
    }

    // Renders 0..=3, buckets 0 0 1 1: the effect ran only on transitions.
    assert_eq!(*log.borrow(), ["bucket 0", "bucket 1"]);
}

#[test]
fn every_setup_gets_at_most_one_cleanup() {
    fn app(props: LogProps) -> Element {
        let generation = use_state(|| 0u32);
        let n = generation.get();
        let log = props.log.clone();
        use_effect_with_deps(
            move |n| {
                let n = *n;
                log.borrow_mut().push(format!("setup {n}"));
                let log = log.clone();
                move || log.borrow_mut().push(format!("cleanup {n}"))
            },
            n,
        );

        Some(
            div()
                .on("click", move |_| generation.set(n + 1))
                .child(n.to_string())
                .build(),
        )
    }

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut layout = Layout::new_with_props(app, LogProps { log: log.clone() });
    let initial = layout.rebuild();
    let target = first_click_target(&initial.model).unwrap();

    layout.deliver(LayoutEvent::new(&target, Vec::new()));
    layout.render_next().unwrap();
    drop(layout);

    assert_eq!(
        *log.borrow(),
        ["setup 0", "cleanup 0", "setup 1", "cleanup 1"]
    );
}
