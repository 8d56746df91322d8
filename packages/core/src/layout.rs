//! The layout: a live tree of component instances and the engine that turns
//! state changes into wire updates.
//!
//! A layout is driven from the outside by two operations, designed to be the
//! two arms of a renderer loop:
//!
//! ```rust, ignore
//! let mut layout = Layout::new(app);
//! send(layout.rebuild());                       // initial full model
//! loop {
//!     tokio::select! {
//!         biased;
//!         update = layout.render() => send(update),
//!         event = recv() => layout.deliver(event),
//!     }
//! }
//! ```
//!
//! All state mutation happens on the single task driving these calls; the
//! layout itself serializes renders and event dispatch.

use crate::any_props::{AnyProps, VProps};
use crate::diff::{collect_child_scopes, DirtyScope};
use crate::error::LayoutError;
use crate::events::{HandlerId, HandlerRegistry};
use crate::model::{validate_model, Model};
use crate::nodes::{Component, Element, VNode};
use crate::protocol::{LayoutEvent, LayoutUpdate};
use crate::runtime::{Runtime, RuntimeGuard};
use crate::scopes::{ScopeId, HOOK_DRIFT_MSG, NO_SCOPE_MSG};
use crate::tasks::SchedulerMsg;
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;
use rustc_hash::FxHashSet;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// A live component tree bound to one connection (or, behind a shared
/// renderer, to many).
pub struct Layout {
    pub(crate) runtime: Rc<Runtime>,
    pub(crate) registry: HandlerRegistry,
    pub(crate) dirty_scopes: std::collections::BTreeSet<DirtyScope>,
    rx: UnboundedReceiver<SchedulerMsg>,
    root: ScopeId,
    mirror: Model,

    // Bookkeeping for the render pass currently being assembled.
    pub(crate) rendered_this_pass: FxHashSet<ScopeId>,
    pub(crate) render_order: Vec<ScopeId>,
}

impl Layout {
    /// Create a layout whose root component takes no props.
    pub fn new(app: Component<()>) -> Self {
        Self::new_with_props(app, ())
    }

    /// Create a layout with props for the root component. The root starts
    /// dirty; the first [`Layout::rebuild`] or [`Layout::render`] call
    /// produces the full model at path `""`.
    pub fn new_with_props<P>(root: Component<P>, props: P) -> Self
    where
        P: Clone + PartialEq + 'static,
    {
        let (tx, rx) = futures_channel::mpsc::unbounded();
        let runtime = Runtime::new(tx);

        let mut layout = Self {
            runtime,
            registry: HandlerRegistry::default(),
            dirty_scopes: Default::default(),
            rx,
            root: ScopeId(0),
            mirror: Model::default(),
            rendered_this_pass: FxHashSet::default(),
            render_order: Vec::new(),
        };

        let root_id = layout.new_scope(
            None,
            std::any::type_name::<P>(),
            None,
            Rc::new(VProps::new(root, props)),
        );
        layout.root = root_id;
        layout.mark_dirty(root_id);
        layout
    }

    /// Provide a context value on the root scope before the first render.
    /// This is how per-connection metadata reaches `use_connection` and
    /// friends.
    pub fn with_root_context<T: Clone + 'static>(self, value: T) -> Self {
        self.runtime.with_scope_state(self.root, |scope| {
            scope.provide_context(value);
        });
        self
    }

    /// Toggle debug mode: model validation on every update plus error
    /// messages surfaced into the tree.
    pub fn with_debug_mode(self, enabled: bool) -> Self {
        self.runtime.debug_mode.set(enabled);
        self
    }

    pub fn root_scope(&self) -> ScopeId {
        self.root
    }

    /// The layout's current full model. A reconnecting client is resynced by
    /// replaying this at path `""`.
    pub fn full_update(&self) -> LayoutUpdate {
        LayoutUpdate::new("", self.mirror.clone())
    }

    /// Number of live handler registrations; exposed for tests.
    pub fn registered_handlers(&self) -> usize {
        self.registry.len()
    }

    /// The annotation a component attached with `use_debug_value`, if debug
    /// mode is on and the scope recorded one.
    pub fn debug_value(&self, id: ScopeId) -> Option<String> {
        self.runtime
            .with_scope_state(id, |scope| scope.debug_value.borrow().clone())
            .flatten()
    }

    /// Tear the whole tree down: every cleanup callback runs in reverse
    /// creation order and every handler registration is released. Called on
    /// client disconnect; also runs when the layout is dropped.
    pub fn unmount(&mut self) {
        let root = self.root;
        self.unmount_scope(root);
    }

    /// Manually mark a scope as requiring a re-render.
    pub fn mark_dirty(&mut self, id: ScopeId) {
        let Some(height) = self.runtime.with_scope_state(id, |scope| scope.height) else {
            return;
        };
        self.dirty_scopes.insert(DirtyScope { height, id });
    }

    /// Perform the initial render, returning the full model at path `""`.
    pub fn rebuild(&mut self) -> LayoutUpdate {
        self.render_next()
            .expect("a fresh layout always has a dirty root")
    }

    /// Suspend until at least one instance is dirty, then render the dirty
    /// ancestors and produce the next update.
    ///
    /// Cancel-safe: dropping the future between awaits loses nothing.
    pub async fn render(&mut self) -> LayoutUpdate {
        loop {
            if let Some(update) = self.render_next() {
                return update;
            }
            self.wait_for_work().await;
        }
    }

    /// Wait until the scheduler has work: a dirty scope or a task wakeup.
    pub async fn wait_for_work(&mut self) {
        let mut some_msg = None;

        loop {
            match some_msg.take() {
                // Drain whatever is synchronously available before waiting.
                Some(msg) => self.handle_scheduler_msg(msg),
                None => match self.rx.try_next() {
                    Ok(Some(msg)) => some_msg = Some(msg),
                    Ok(None) => return,
                    Err(_) => {
                        if !self.dirty_scopes.is_empty() {
                            return;
                        }
                        some_msg = self.rx.next().await;
                    }
                },
            }
        }
    }

    /// Route one event message to its registered handler.
    ///
    /// Unknown targets are dropped: the element unmounted after the client
    /// sent the event. Handler panics are logged and the event still counts
    /// as delivered.
    pub fn deliver(&mut self, event: LayoutEvent) {
        let Some(id) = HandlerId::parse(&event.target) else {
            tracing::debug!(target = %event.target, "dropping event with malformed target");
            return;
        };
        let Some(handler) = self.registry.get(id) else {
            tracing::debug!(target = %event.target, "dropping event for released target");
            return;
        };

        let callback = handler.callback.clone();
        let scope = handler.scope;
        let runtime = self.runtime.clone();
        let _guard = RuntimeGuard::new(runtime.clone());

        let result = runtime.with_scope_on_stack(scope, || {
            catch_unwind(AssertUnwindSafe(|| callback.call(event.data)))
        });

        if let Err(payload) = result {
            let error = LayoutError::EventHandlerFailure {
                target: event.target,
                message: panic_message(&payload),
            };
            tracing::error!(scope = scope.0, "{error}");
        }
    }

    /// Render the next dirty scope, if any, and produce its update.
    pub fn render_next(&mut self) -> Option<LayoutUpdate> {
        self.drain_scheduler();

        loop {
            let dirty = *self.dirty_scopes.iter().next()?;
            self.dirty_scopes.remove(&dirty);
            if !self.scope_exists(dirty.id) {
                continue;
            }

            self.rendered_this_pass.clear();
            self.render_order.clear();
            self.run_scope(dirty.id);

            // Descendants re-rendered by this pass would be redundant work.
            let rendered = std::mem::take(&mut self.rendered_this_pass);
            self.dirty_scopes.retain(|entry| !rendered.contains(&entry.id));
            self.rendered_this_pass = rendered;

            let path = self
                .runtime
                .with_scope_state(dirty.id, |scope| scope.patch_path.borrow().clone())
                .unwrap_or_default();
            let model = self.serialize_scope(dirty.id, path.clone());

            if let Err(err) = self.mirror.apply(&path, model.clone()) {
                tracing::error!(%path, "failed to splice update into the mirror: {err}");
            }

            if self.runtime.debug_mode() {
                if let Err(violation) = validate_model(&self.mirror) {
                    tracing::error!("emitted model violates the wire schema: {violation}");
                }
            }

            self.flush_effects();

            return Some(LayoutUpdate::new(path, model));
        }
    }

    fn handle_scheduler_msg(&mut self, msg: SchedulerMsg) {
        match msg {
            SchedulerMsg::Immediate(id) => self.mark_dirty(id),
            SchedulerMsg::TaskNotified(task) => {
                let _guard = RuntimeGuard::new(self.runtime.clone());
                self.runtime.handle_task_wakeup(task);
            }
        }
    }

    fn drain_scheduler(&mut self) {
        while let Ok(Some(msg)) = self.rx.try_next() {
            self.handle_scheduler_msg(msg);
        }
    }

    fn scope_exists(&self, id: ScopeId) -> bool {
        self.runtime.scopes.borrow().contains(id.0)
    }

    pub(crate) fn new_scope(
        &mut self,
        parent: Option<ScopeId>,
        name: &'static str,
        key: Option<String>,
        props: Rc<dyn AnyProps>,
    ) -> ScopeId {
        let height = parent
            .and_then(|parent| self.runtime.with_scope_state(parent, |scope| scope.height + 1))
            .unwrap_or(0);

        let mut scopes = self.runtime.scopes.borrow_mut();
        let entry = scopes.vacant_entry();
        let id = ScopeId(entry.key());
        entry.insert(crate::scopes::ScopeState::new(
            id,
            parent,
            height,
            name,
            key,
            props,
            self.runtime.sender.clone(),
        ));
        id
    }

    pub(crate) fn is_dirty(&self, id: ScopeId) -> bool {
        let Some(height) = self.runtime.with_scope_state(id, |scope| scope.height) else {
            return false;
        };
        self.dirty_scopes.contains(&DirtyScope { height, id })
    }

    /// Run one component's render function and reconcile its output against
    /// the previous render.
    pub(crate) fn run_scope(&mut self, scope_id: ScopeId) {
        let runtime = self.runtime.clone();
        let _guard = RuntimeGuard::new(runtime.clone());

        let Some(props) = runtime.with_scope_state(scope_id, |scope| {
            scope.hook_idx.set(0);
            scope.props.borrow().clone()
        }) else {
            return;
        };

        runtime.rendering.set(true);
        let result = runtime.with_scope_on_stack(scope_id, || {
            catch_unwind(AssertUnwindSafe(|| props.render()))
        });
        runtime.rendering.set(false);

        let new_node = match result {
            Ok(element) => self.finish_render(scope_id, element),
            Err(payload) => {
                let message = panic_message(&payload);
                self.fail_render(scope_id, message)
            }
        };

        let old_node = runtime
            .with_scope_state(scope_id, |scope| scope.last_node.borrow_mut().take())
            .flatten();
        self.reconcile_node(scope_id, old_node, &new_node);

        let mut children = Vec::new();
        collect_child_scopes(&new_node, &mut children);

        runtime.with_scope_state(scope_id, move |scope| {
            *scope.children.borrow_mut() = children;
            *scope.last_node.borrow_mut() = Some(new_node);
            scope.render_count.set(scope.render_count.get() + 1);
        });

        self.rendered_this_pass.insert(scope_id);
        self.render_order.push(scope_id);
    }

    /// A render returned normally; check for hook-count drift before
    /// accepting the output.
    fn finish_render(&mut self, scope_id: ScopeId, element: Element) -> VNode {
        let drifted = self
            .runtime
            .with_scope_state(scope_id, |scope| {
                scope.render_count.get() > 0 && scope.hook_idx.get() != scope.hooks.borrow().len()
            })
            .unwrap_or(false);

        if drifted {
            let error = LayoutError::HookOrderViolation(
                "a render used fewer hooks than the one before it".into(),
            );
            tracing::error!(scope = scope_id.0, "{error}");
            self.runtime.with_scope_state(scope_id, |scope| {
                scope.reset_hooks();
                *scope.render_error.borrow_mut() = None;
            });
            return VNode::placeholder();
        }

        self.runtime.with_scope_state(scope_id, |scope| {
            *scope.render_error.borrow_mut() = None;
        });
        element.unwrap_or_else(VNode::placeholder)
    }

    /// A render panicked. Hook misuse becomes an empty node; any other
    /// failure becomes an error node, surfaced verbatim only in debug mode.
    fn fail_render(&mut self, scope_id: ScopeId, message: String) -> VNode {
        let is_hook_misuse =
            message.starts_with(HOOK_DRIFT_MSG) || message.starts_with(NO_SCOPE_MSG);

        let name = self
            .runtime
            .with_scope_state(scope_id, |scope| scope.name)
            .unwrap_or("<unmounted>");

        if is_hook_misuse {
            let error = if message.starts_with(NO_SCOPE_MSG) {
                LayoutError::HookOutOfContext
            } else {
                LayoutError::HookOrderViolation(message)
            };
            tracing::error!(scope = scope_id.0, component = name, "{error}");
            self.runtime.with_scope_state(scope_id, |scope| {
                scope.reset_hooks();
                *scope.render_error.borrow_mut() = None;
            });
        } else {
            let error = LayoutError::RenderFailure {
                name: name.to_string(),
                message: message.clone(),
            };
            tracing::error!(scope = scope_id.0, "{error}");
            self.runtime.with_scope_state(scope_id, |scope| {
                scope.reset_hooks();
                *scope.render_error.borrow_mut() = Some(message);
            });
        }

        VNode::placeholder()
    }

    /// Run the effects queued by this pass, children before parents.
    fn flush_effects(&mut self) {
        let order = std::mem::take(&mut self.render_order);
        let _guard = RuntimeGuard::new(self.runtime.clone());

        for scope_id in order {
            let effects = self
                .runtime
                .with_scope_state(scope_id, |scope| {
                    std::mem::take(&mut *scope.pending_effects.borrow_mut())
                })
                .unwrap_or_default();

            for effect in effects {
                if catch_unwind(AssertUnwindSafe(effect)).is_err() {
                    tracing::error!(scope = scope_id.0, "effect panicked after render");
                }
            }
        }
    }
}

impl Drop for Layout {
    fn drop(&mut self) {
        // Unmounting twice is a no-op; the scope slab is already empty.
        self.unmount();
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
