//! Helpers shared by the integration tests.

use lattice_core::{Model, ModelChild};

/// The target ID of the first handler registered for `event` anywhere in
/// the model.
pub fn find_target(model: &Model, event: &str) -> Option<String> {
    if let Some(descriptor) = model.event_handlers.get(event) {
        return Some(descriptor.target.clone());
    }
    model.children.iter().find_map(|child| match child {
        ModelChild::Node(node) => find_target(node, event),
        ModelChild::Text(_) => None,
    })
}

/// Every text fragment in the model, concatenated in document order.
pub fn collect_text(model: &Model) -> String {
    let mut out = String::new();
    collect_into(model, &mut out);
    out
}

fn collect_into(model: &Model, out: &mut String) {
    for child in &model.children {
        match child {
            ModelChild::Text(text) => out.push_str(text),
            ModelChild::Node(node) => collect_into(node, out),
        }
    }
}
