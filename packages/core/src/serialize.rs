//! Turning rendered trees into wire models.
//!
//! Serialization is where the builder tree and the protocol meet: listeners
//! are swapped for stable target descriptors, component boundaries dissolve
//! into their children's output, and every scope learns the patch path its
//! next update will be emitted at.

use crate::events::{HandlerId, RegisteredHandler};
use crate::layout::Layout;
use crate::model::{join_path, EventTarget, ImportSourceModel, Model, ModelChild};
use crate::nodes::{ImportSource, VElement, VNode};
use crate::scopes::{ElementPath, ListenerKey, PathSegment, ScopeId};
use rustc_hash::FxHashMap;

impl Layout {
    /// Produce the wire model for one scope's subtree rooted at `path`.
    ///
    /// Scopes untouched by the current pass reuse their cached model; only
    /// their patch paths are rebased if the subtree moved. Fresh renders are
    /// walked in full, re-assigning listener IDs: an element that kept its
    /// position-or-key and its event names keeps its IDs, everything else is
    /// released.
    pub(crate) fn serialize_scope(&mut self, scope_id: ScopeId, path: String) -> Model {
        let runtime = self.runtime.clone();

        let prev_path = runtime
            .with_scope_state(scope_id, |scope| {
                std::mem::replace(&mut *scope.patch_path.borrow_mut(), path.clone())
            })
            .unwrap_or_default();

        if !self.rendered_this_pass.contains(&scope_id) {
            let cached = runtime
                .with_scope_state(scope_id, |scope| scope.cached_model.borrow().clone())
                .flatten();
            if let Some(model) = cached {
                if prev_path != path {
                    self.rebase_descendants(scope_id, &prev_path, &path);
                }
                return model;
            }
        }

        let error = runtime
            .with_scope_state(scope_id, |scope| scope.render_error.borrow().clone())
            .flatten();

        let model = match error {
            Some(message) => {
                // The error node carries no listeners; whatever the previous
                // render registered is released here.
                let stale: Vec<HandlerId> = runtime
                    .with_scope_state(scope_id, |scope| {
                        scope.listener_ids.borrow_mut().drain().map(|(_, id)| id).collect()
                    })
                    .unwrap_or_default();
                for id in stale {
                    self.registry.release(id);
                }

                Model {
                    error: Some(if runtime.debug_mode() {
                        message
                    } else {
                        String::new()
                    }),
                    ..Default::default()
                }
            }
            None => {
                let node = runtime
                    .with_scope_state(scope_id, |scope| scope.last_node.borrow_mut().take())
                    .flatten();
                match node {
                    Some(node) => {
                        let mut kept_ids = FxHashMap::default();
                        let model = self.serialize_root(scope_id, &node, &path, &mut kept_ids);

                        runtime.with_scope_state(scope_id, |scope| {
                            *scope.last_node.borrow_mut() = Some(node);
                        });

                        let stale: Vec<HandlerId> = runtime
                            .with_scope_state(scope_id, |scope| {
                                let mut ids = scope.listener_ids.borrow_mut();
                                let stale = ids
                                    .iter()
                                    .filter(|(key, _)| !kept_ids.contains_key(*key))
                                    .map(|(_, id)| *id)
                                    .collect();
                                *ids = kept_ids;
                                stale
                            })
                            .unwrap_or_default();
                        for id in stale {
                            self.registry.release(id);
                        }

                        model
                    }
                    // A scope that has never completed a render serializes
                    // as a zero-width node.
                    None => Model::default(),
                }
            }
        };

        runtime.with_scope_state(scope_id, |scope| {
            *scope.cached_model.borrow_mut() = Some(model.clone());
        });
        model
    }

    /// A scope's output is always a single model node: a bare text render is
    /// wrapped in a fragment, a component-at-root passes straight through to
    /// the child scope at the same path.
    fn serialize_root(
        &mut self,
        owner: ScopeId,
        node: &VNode,
        path: &str,
        kept_ids: &mut FxHashMap<ListenerKey, HandlerId>,
    ) -> Model {
        match node {
            VNode::Element(el) => {
                let mut seg_path = ElementPath::new();
                self.serialize_element(owner, el, path, &mut seg_path, kept_ids)
            }
            VNode::Text(text) => Model {
                children: vec![ModelChild::Text(text.clone())],
                ..Default::default()
            },
            VNode::Component(comp) => {
                let scope = comp
                    .scope
                    .get()
                    .expect("serialized component was mounted into a scope");
                self.serialize_scope(scope, path.to_string())
            }
        }
    }

    fn serialize_element(
        &mut self,
        owner: ScopeId,
        el: &VElement,
        model_path: &str,
        seg_path: &mut ElementPath,
        kept_ids: &mut FxHashMap<ListenerKey, HandlerId>,
    ) -> Model {
        let mut model = Model {
            tag_name: el.tag.clone(),
            key: el.key.clone(),
            attributes: el.attributes.clone(),
            import_source: el.import_source.as_ref().map(serialize_import_source),
            ..Default::default()
        };

        for listener in &el.listeners {
            let key: ListenerKey = (seg_path.clone(), listener.name.clone());
            let registered = RegisteredHandler {
                scope: owner,
                callback: listener.callback.clone(),
                prevent_default: listener.prevent_default,
                stop_propagation: listener.stop_propagation,
            };
            let id = match self
                .runtime
                .with_scope_state(owner, |scope| scope.listener_ids.borrow().get(&key).copied())
                .flatten()
            {
                // Same element slot, same event name: keep the wire target,
                // swap in the closure from this render.
                Some(id) => {
                    self.registry.update(id, registered);
                    id
                }
                None => self.registry.allocate(registered),
            };
            kept_ids.insert(key, id);
            model.event_handlers.insert(
                listener.name.clone(),
                EventTarget {
                    target: id.to_string(),
                    prevent_default: listener.prevent_default,
                    stop_propagation: listener.stop_propagation,
                },
            );
        }

        for (index, child) in el.children.iter().enumerate() {
            let child_path = join_path(model_path, index);
            let segment = match child.key() {
                Some(key) => PathSegment::Key(key.to_string()),
                None => PathSegment::Index(index as u32),
            };
            seg_path.push(segment);
            let serialized = match child {
                VNode::Text(text) => ModelChild::Text(text.clone()),
                VNode::Element(child_el) => ModelChild::Node(self.serialize_element(
                    owner, child_el, &child_path, seg_path, kept_ids,
                )),
                VNode::Component(comp) => {
                    let scope = comp
                        .scope
                        .get()
                        .expect("serialized component was mounted into a scope");
                    ModelChild::Node(self.serialize_scope(scope, child_path))
                }
            };
            seg_path.pop();
            model.children.push(serialized);
        }

        model
    }

    /// A retained subtree moved without re-rendering: swap the path prefix
    /// on every scope below it.
    fn rebase_descendants(&self, scope_id: ScopeId, old_prefix: &str, new_prefix: &str) {
        let children = self
            .runtime
            .with_scope_state(scope_id, |scope| scope.children.borrow().clone())
            .unwrap_or_default();

        for child in children {
            self.runtime.with_scope_state(child, |scope| {
                let mut path = scope.patch_path.borrow_mut();
                let rebased = path
                    .strip_prefix(old_prefix)
                    .map(|rest| format!("{new_prefix}{rest}"));
                if let Some(rebased) = rebased {
                    *path = rebased;
                }
            });
            self.rebase_descendants(child, old_prefix, new_prefix);
        }
    }
}

/// Fallbacks are serialized statically: no listener registration, and any
/// component inside one renders as a zero-width node.
fn serialize_import_source(source: &ImportSource) -> ImportSourceModel {
    ImportSourceModel {
        source: source.source.clone(),
        source_type: source.source_type,
        fallback: source.fallback.as_deref().map(serialize_static_child),
        unmount_before_update: source.unmount_before_update,
    }
}

fn serialize_static_child(node: &VNode) -> Box<ModelChild> {
    Box::new(match node {
        VNode::Text(text) => ModelChild::Text(text.clone()),
        VNode::Element(el) => ModelChild::Node(serialize_static_element(el)),
        VNode::Component(_) => ModelChild::Node(Model::default()),
    })
}

fn serialize_static_element(el: &VElement) -> Model {
    Model {
        tag_name: el.tag.clone(),
        key: el.key.clone(),
        attributes: el.attributes.clone(),
        import_source: el.import_source.as_ref().map(serialize_import_source),
        children: el
            .children
            .iter()
            .map(|child| *serialize_static_child(child))
            .collect(),
        ..Default::default()
    }
}
