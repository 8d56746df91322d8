//! Reconciliation: deciding which component instances survive a render.
//!
//! The rules, per parent:
//! - children pair by key when both sides carry one, by position otherwise
//! - a pair is retained only if the tag (elements) or render function
//!   (components) also matches; anything else drops and re-creates
//! - unmatched old children unmount depth-first, running cleanup callbacks
//!   in reverse creation order and releasing every handler ID they own

use crate::layout::Layout;
use crate::nodes::VNode;
use crate::runtime::RuntimeGuard;
use crate::scopes::ScopeId;
use rustc_hash::FxHashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// An entry in the layout's dirty set, ordered by tree height so ancestors
/// render before the descendants they might re-render anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirtyScope {
    pub height: u32,
    pub id: ScopeId,
}

impl Layout {
    /// Walk an old/new node pair, retaining, re-rendering, or replacing the
    /// component instances underneath. `owner` is the scope whose render
    /// produced both trees.
    pub(crate) fn reconcile_node(&mut self, owner: ScopeId, old: Option<VNode>, new: &VNode) {
        match (old, new) {
            (Some(VNode::Text(_)), VNode::Text(_)) => {}

            (Some(VNode::Element(mut old_el)), VNode::Element(new_el))
                if old_el.tag == new_el.tag =>
            {
                let old_children = std::mem::take(&mut old_el.children);
                self.reconcile_children(owner, old_children, &new_el.children);
            }

            (Some(VNode::Component(old_comp)), VNode::Component(new_comp))
                if old_comp.props.fn_id() == new_comp.props.fn_id() =>
            {
                let scope_id = old_comp
                    .scope
                    .get()
                    .expect("retained component was mounted into a scope");
                new_comp.scope.set(Some(scope_id));

                let props_changed = self
                    .runtime
                    .with_scope_state(scope_id, |scope| {
                        let changed = !new_comp.props.memoize(&**scope.props.borrow());
                        *scope.props.borrow_mut() = new_comp.props.clone();
                        changed
                    })
                    .unwrap_or(false);

                // New args force a render; otherwise the child only re-runs
                // when it is itself dirty, folding into this pass instead of
                // producing a separate update later.
                if props_changed || self.is_dirty(scope_id) {
                    self.run_scope(scope_id);
                }
            }

            (old, new) => {
                if let Some(old) = old {
                    self.unmount_node(old);
                }
                self.mount_node(owner, new);
            }
        }
    }

    pub(crate) fn reconcile_children(
        &mut self,
        owner: ScopeId,
        old_children: Vec<VNode>,
        new_children: &[VNode],
    ) {
        let mut old_slots: Vec<Option<VNode>> = old_children.into_iter().map(Some).collect();

        let mut keyed: FxHashMap<String, usize> = FxHashMap::default();
        for (index, slot) in old_slots.iter().enumerate() {
            if let Some(key) = slot.as_ref().and_then(VNode::key) {
                keyed.insert(key.to_string(), index);
            }
        }

        for (index, new_child) in new_children.iter().enumerate() {
            let paired = match new_child.key() {
                Some(key) => keyed
                    .remove(key)
                    .and_then(|old_index| old_slots[old_index].take()),
                None => match old_slots.get_mut(index) {
                    // A keyed old child never pairs positionally.
                    Some(slot) if slot.as_ref().is_some_and(|old| old.key().is_none()) => {
                        slot.take()
                    }
                    _ => None,
                },
            };
            self.reconcile_node(owner, paired, new_child);
        }

        // Reverse creation order: later siblings unwind first.
        for leftover in old_slots.into_iter().flatten().rev() {
            self.unmount_node(leftover);
        }
    }

    /// Create scopes for every component in a freshly produced subtree and
    /// render them.
    pub(crate) fn mount_node(&mut self, owner: ScopeId, new: &VNode) {
        match new {
            VNode::Text(_) => {}
            VNode::Element(el) => {
                for child in &el.children {
                    self.mount_node(owner, child);
                }
            }
            VNode::Component(comp) => {
                let id = self.new_scope(Some(owner), comp.name, comp.key.clone(), comp.props.clone());
                comp.scope.set(Some(id));
                self.run_scope(id);
            }
        }
    }

    /// Drop every component instance inside a discarded subtree, later
    /// siblings first so cleanups run in reverse creation order.
    pub(crate) fn unmount_node(&mut self, old: VNode) {
        match old {
            VNode::Text(_) => {}
            VNode::Element(el) => {
                for child in el.children.into_iter().rev() {
                    self.unmount_node(child);
                }
            }
            VNode::Component(comp) => {
                if let Some(id) = comp.scope.get() {
                    self.unmount_scope(id);
                }
            }
        }
    }

    /// Tear down one scope and everything below it. Cleanups run in reverse
    /// creation order: the most recently created scope unwinds first, and
    /// within a scope the callbacks registered last run first.
    pub(crate) fn unmount_scope(&mut self, id: ScopeId) {
        let Some(state) = self.runtime.scopes.borrow_mut().try_remove(id.0) else {
            return;
        };

        self.dirty_scopes.remove(&DirtyScope {
            height: state.height,
            id,
        });

        for child in state.children.into_inner().into_iter().rev() {
            self.unmount_scope(child);
        }

        let _guard = RuntimeGuard::new(self.runtime.clone());
        for callback in state.drop_callbacks.into_inner().into_iter().rev() {
            if catch_unwind(AssertUnwindSafe(callback)).is_err() {
                tracing::error!(scope = id.0, "cleanup callback panicked during unmount");
            }
        }

        for (_, handler) in state.listener_ids.into_inner() {
            self.registry.release(handler);
        }
    }
}

/// Collect the scopes mounted directly inside one rendered tree, in the
/// order they appear.
pub(crate) fn collect_child_scopes(node: &VNode, out: &mut Vec<ScopeId>) {
    match node {
        VNode::Text(_) => {}
        VNode::Element(el) => {
            for child in &el.children {
                collect_child_scopes(child, out);
            }
        }
        VNode::Component(comp) => {
            if let Some(id) = comp.scope.get() {
                out.push(id);
            }
        }
    }
}
