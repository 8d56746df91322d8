//! `use_memo`, `use_callback`, and `use_ref` retention semantics.

use lattice_core::prelude::*;
use lattice_core::{LayoutEvent, Model, ModelChild};
use lattice_hooks::{use_callback, use_memo, use_ref, use_state};
use lattice_html::div;
use std::cell::RefCell;
use std::rc::Rc;

fn first_click_target(model: &Model) -> Option<String> {
    if let Some(descriptor) = model.event_handlers.get("click") {
        return Some(descriptor.target.clone());
    }
    model.children.iter().find_map(|child| match child {
        ModelChild::Node(node) => first_click_target(node),
        ModelChild::Text(_) => None,
    })
}

fn collect_text(model: &Model) -> String {
    let mut out = String::new();
    fn rec(model: &Model, out: &mut String) {
        for child in &model.children {
            match child {
                ModelChild::Text(text) => out.push_str(text),
                ModelChild::Node(node) => rec(node, out),
            }
        }
    }
    rec(model, &mut out);
    out
}

#[derive(Clone)]
struct CountProps {
    computations: Rc<RefCell<u32>>,
}

impl PartialEq for CountProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.computations, &other.computations)
    }
}

#[test]
fn memo_recomputes_only_when_deps_change() {
    fn app(props: CountProps) -> Element {
        let generation = use_state(|| 0u32);
        let n = generation.get();
        let bucket = n / 2;

        let computations = props.computations.clone();
        let label = use_memo(bucket, move |bucket| {
            *computations.borrow_mut() += 1;
            format!("bucket-{bucket}")
        });

        Some(
            div()
                .on("click", move |_| generation.set(n + 1))
                .child(label)
                .build(),
        )
    }

    let computations = Rc::new(RefCell::new(0));
    let mut layout = Layout::new_with_props(
        app,
        CountProps {
            computations: computations.clone(),
        },
    );
    let initial = layout.rebuild();
    let target = first_click_target(&initial.model).unwrap();

    for _ in 0..3 {
        layout.deliver(LayoutEvent::new(&target, Vec::new()));
        layout.render_next().unwrap();
    }

    // Four renders, two distinct buckets.
    assert_eq!(*computations.borrow(), 2);
    assert_eq!(collect_text(&layout.full_update().model), "bucket-1");
}

#[test]
fn callback_allocation_is_stable_until_deps_change() {
    fn app(props: CountProps) -> Element {
        let generation = use_state(|| 0u32);
        let n = generation.get();

        let callback = use_callback((), |()| ());
        let pointer = Rc::as_ptr(&callback) as usize;

        // Track distinct allocations across renders.
        let seen = props.computations.clone();
        let slot = use_ref(|| 0usize);
        if slot.with(|stored| *stored != pointer) {
            slot.set(pointer);
            *seen.borrow_mut() += 1;
        }

        Some(
            div()
                .on("click", move |_| generation.set(n + 1))
                .child(n.to_string())
                .build(),
        )
    }

    let allocations = Rc::new(RefCell::new(0));
    let mut layout = Layout::new_with_props(
        app,
        CountProps {
            computations: allocations.clone(),
        },
    );
    let initial = layout.rebuild();
    let target = first_click_target(&initial.model).unwrap();

    for _ in 0..3 {
        layout.deliver(LayoutEvent::new(&target, Vec::new()));
        layout.render_next().unwrap();
    }

    assert_eq!(*allocations.borrow(), 1);
}

#[test]
fn refs_persist_without_scheduling_renders() {
    fn app(_: ()) -> Element {
        let renders = use_ref(|| 0u32);
        renders.with_mut(|n| *n += 1);
        let seen = renders.with(|n| *n);

        Some(div().child(seen.to_string()).build())
    }

    let mut layout = Layout::new(app);
    let initial = layout.rebuild();
    assert_eq!(collect_text(&initial.model), "1");

    // Mutating the ref did not mark the scope dirty.
    assert!(layout.render_next().is_none());
}
