//! The pluggable rendering backend.
//!
//! The reconciler never touches a real DOM itself; it drives an
//! implementation of [`DomBackend`] with node handles it allocates. A
//! browser embedding maps handles to real elements; tests use the in-memory
//! backend from [`crate::testing`].

use lattice_core::{AttributeValue, EventTarget};

/// An opaque handle to one constructed DOM node. Allocated by the
/// reconciler, never reused while the node is mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Cleanup returned by evaluating a script element's text: called once when
/// the script's element unmounts or its content changes.
pub type ScriptCleanup = Box<dyn FnOnce()>;

/// The write interface onto the real DOM.
///
/// `parent = None` addresses the mount point the whole layout renders into.
pub trait DomBackend {
    fn create_element(&mut self, id: NodeId, tag: &str);

    fn create_text(&mut self, id: NodeId, text: &str);

    fn set_text(&mut self, id: NodeId, text: &str);

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &AttributeValue);

    fn remove_attribute(&mut self, id: NodeId, name: &str);

    /// Install a native listener that serializes events for `descriptor`'s
    /// target and honors its preventDefault/stopPropagation flags.
    fn add_event_listener(&mut self, id: NodeId, event: &str, descriptor: &EventTarget);

    fn remove_event_listener(&mut self, id: NodeId, event: &str);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Option<NodeId>, child: NodeId);

    /// Insert `child` immediately before `anchor` under `parent`.
    fn insert_before(&mut self, parent: Option<NodeId>, anchor: NodeId, child: NodeId);

    /// Detach a node (and everything inside it) from the document.
    fn remove_node(&mut self, id: NodeId);

    /// Evaluate script text. The returned cleanup is the function the
    /// evaluation produced, if it produced one.
    fn eval_script(&mut self, code: &str) -> Option<ScriptCleanup>;
}
