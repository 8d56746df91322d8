//! Component scopes: the per-instance lifecycle record.
//!
//! A [`ScopeState`] is what the layout keeps for every mounted component:
//! the ordered hook slots, the queued effects and their cleanups, provided
//! contexts, the schedule-render callback, and the cached output of the last
//! render. Scopes are slab-allocated; an unmounted scope's slot is reused.

use crate::any_props::AnyProps;
use crate::events::HandlerId;
use crate::model::Model;
use crate::nodes::VNode;
use crate::runtime::{with_current_scope, with_runtime};
use crate::tasks::SchedulerMsg;
use futures_channel::mpsc::UnboundedSender;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The index of a scope in its layout's arena.
///
/// Not unique across layouts or across time: slots are reused after unmount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub usize);

/// One step of an element's position within its owning scope's output:
/// the sibling key when the element has one, its child index otherwise.
/// Keyed elements therefore keep their listener IDs across reorders.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum PathSegment {
    Index(u32),
    Key(String),
}

pub(crate) type ElementPath = SmallVec<[PathSegment; 8]>;

/// Identifies one listener slot within a scope's output tree.
pub(crate) type ListenerKey = (ElementPath, String);

pub struct ScopeState {
    pub(crate) id: ScopeId,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) height: u32,
    pub(crate) name: &'static str,
    pub(crate) key: Option<String>,
    pub(crate) props: RefCell<Rc<dyn AnyProps>>,

    pub(crate) render_count: Cell<usize>,
    pub(crate) hooks: RefCell<Vec<Box<dyn Any>>>,
    pub(crate) hook_idx: Cell<usize>,

    /// Effects queued by the current render; drained after the update that
    /// carries this render has been produced.
    pub(crate) pending_effects: RefCell<Vec<Box<dyn FnOnce()>>>,

    /// Runs at unmount in reverse registration order: effect cleanups,
    /// context unsubscriptions, anything a hook needs torn down.
    pub(crate) drop_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,

    pub(crate) shared_contexts: RefCell<FxHashMap<TypeId, Box<dyn Any>>>,

    pub(crate) sender: UnboundedSender<SchedulerMsg>,

    // Output of the last render and its wire bookkeeping.
    pub(crate) last_node: RefCell<Option<VNode>>,
    pub(crate) render_error: RefCell<Option<String>>,
    pub(crate) listener_ids: RefCell<FxHashMap<ListenerKey, HandlerId>>,
    pub(crate) patch_path: RefCell<String>,
    pub(crate) cached_model: RefCell<Option<Model>>,
    pub(crate) children: RefCell<Vec<ScopeId>>,

    pub(crate) debug_value: RefCell<Option<String>>,
}

impl ScopeState {
    pub(crate) fn new(
        id: ScopeId,
        parent: Option<ScopeId>,
        height: u32,
        name: &'static str,
        key: Option<String>,
        props: Rc<dyn AnyProps>,
        sender: UnboundedSender<SchedulerMsg>,
    ) -> Self {
        Self {
            id,
            parent,
            height,
            name,
            key,
            props: RefCell::new(props),
            render_count: Cell::new(0),
            hooks: RefCell::new(Vec::new()),
            hook_idx: Cell::new(0),
            pending_effects: RefCell::new(Vec::new()),
            drop_callbacks: RefCell::new(Vec::new()),
            shared_contexts: RefCell::new(FxHashMap::default()),
            sender,
            last_node: RefCell::new(None),
            render_error: RefCell::new(None),
            listener_ids: RefCell::new(FxHashMap::default()),
            patch_path: RefCell::new(String::new()),
            cached_model: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            debug_value: RefCell::new(None),
        }
    }

    pub fn scope_id(&self) -> ScopeId {
        self.id
    }

    /// The number of scopes above this one; the root has height 0.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Create a callback that schedules a re-render of this component.
    pub fn schedule_update(&self) -> Rc<dyn Fn()> {
        let chan = self.sender.clone();
        let id = self.id;
        Rc::new(move || {
            let _ = chan.unbounded_send(SchedulerMsg::Immediate(id));
        })
    }

    /// Mark this component as needing another render.
    pub fn needs_update(&self) {
        let _ = self.sender.unbounded_send(SchedulerMsg::Immediate(self.id));
    }

    /// Store a value between renders.
    ///
    /// This is *the* foundational hook all other hooks build on. Each render
    /// must call the same hooks in the same order; drifting order or count is
    /// detected and fails the render.
    pub fn use_hook<State: Clone + 'static>(&self, initializer: impl FnOnce() -> State) -> State {
        let idx = self.hook_idx.get();
        self.hook_idx.set(idx + 1);

        if idx == self.hooks.borrow().len() {
            if self.render_count.get() > 0 {
                panic!("{HOOK_DRIFT_MSG}");
            }
            let value = initializer();
            self.hooks.borrow_mut().push(Box::new(value));
        }

        let hooks = self.hooks.borrow();
        match hooks.get(idx).and_then(|slot| slot.downcast_ref::<State>()) {
            Some(state) => state.clone(),
            None => panic!("{HOOK_DRIFT_MSG}"),
        }
    }

    /// Expose a value to this scope's descendants.
    pub fn provide_context<T: Clone + 'static>(&self, value: T) -> T {
        self.shared_contexts
            .borrow_mut()
            .insert(TypeId::of::<T>(), Box::new(value.clone()));
        value
    }

    /// A context provided on this scope itself, not its ancestors.
    pub fn context<T: Clone + 'static>(&self) -> Option<T> {
        self.shared_contexts
            .borrow()
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Queue a side effect to run after the update produced by this render
    /// has been emitted.
    pub fn push_effect(&self, effect: impl FnOnce() + 'static) {
        self.pending_effects.borrow_mut().push(Box::new(effect));
    }

    /// Register a callback that runs when this scope unmounts.
    pub fn push_drop_callback(&self, callback: impl FnOnce() + 'static) {
        self.drop_callbacks.borrow_mut().push(Box::new(callback));
    }

    /// Wipe all hook state, running pending cleanups. Used when a render
    /// fails and the component restarts from scratch.
    pub(crate) fn reset_hooks(&self) {
        let callbacks = std::mem::take(&mut *self.drop_callbacks.borrow_mut());
        for callback in callbacks.into_iter().rev() {
            callback();
        }
        self.hooks.borrow_mut().clear();
        self.hook_idx.set(0);
        self.pending_effects.borrow_mut().clear();
        self.render_count.set(0);
    }
}

pub(crate) const HOOK_DRIFT_MSG: &str = r#"hooks must be called in the same order on every render.
You likely called a hook inside a conditional or a loop with a varying trip count.
Functions prefixed with `use` must run unconditionally at the top of the component."#;

pub(crate) const NO_SCOPE_MSG: &str =
    "hook called outside of a component render; hooks are only legal while a component function is running";

// ---------------------------------------------------------------------------
// The free-function hook API. These resolve the currently rendering scope
// through the thread-local runtime stack.
// ---------------------------------------------------------------------------

/// The scope currently rendering, if any.
pub fn current_scope_id() -> Option<ScopeId> {
    with_runtime(|runtime| runtime.current_scope_id()).flatten()
}

/// Store a value between renders of the current component. See
/// [`ScopeState::use_hook`].
///
/// Hooks are only legal while a render function is running synchronously;
/// calling one from an event handler or a spawned task fails.
pub fn use_hook<State: Clone + 'static>(initializer: impl FnOnce() -> State) -> State {
    let rendering = with_runtime(|runtime| runtime.rendering.get()).unwrap_or(false);
    if !rendering {
        panic!("{NO_SCOPE_MSG}");
    }
    match with_current_scope(|scope| scope.use_hook(initializer)) {
        Some(value) => value,
        None => panic!("{NO_SCOPE_MSG}"),
    }
}

/// A callback that re-renders the current component when called.
pub fn schedule_update() -> Rc<dyn Fn()> {
    match with_current_scope(|scope| scope.schedule_update()) {
        Some(update) => update,
        None => panic!("{NO_SCOPE_MSG}"),
    }
}

/// A callback that re-renders any component given its [`ScopeId`].
pub fn schedule_update_any() -> Rc<dyn Fn(ScopeId)> {
    match with_runtime(|runtime| {
        let chan = runtime.sender.clone();
        Rc::new(move |id| {
            let _ = chan.unbounded_send(SchedulerMsg::Immediate(id));
        }) as Rc<dyn Fn(ScopeId)>
    }) {
        Some(update) => update,
        None => panic!("{NO_SCOPE_MSG}"),
    }
}

/// Provide a context value on the current scope.
pub fn provide_context<T: Clone + 'static>(value: T) -> T {
    match with_current_scope(|scope| scope.provide_context(value)) {
        Some(value) => value,
        None => panic!("{NO_SCOPE_MSG}"),
    }
}

/// Find a context of type `T` on the current scope or any ancestor.
pub fn try_consume_context<T: Clone + 'static>() -> Option<T> {
    with_runtime(|runtime| {
        let id = runtime.current_scope_id()?;
        runtime.consume_context::<T>(id)
    })
    .flatten()
}

/// Queue an effect on the current scope. See [`ScopeState::push_effect`].
pub fn push_effect(effect: impl FnOnce() + 'static) {
    if with_current_scope(|scope| scope.push_effect(effect)).is_none() {
        panic!("{NO_SCOPE_MSG}");
    }
}

/// Register an unmount callback on the current scope.
pub fn push_drop_callback(callback: impl FnOnce() + 'static) {
    if with_current_scope(|scope| scope.push_drop_callback(callback)).is_none() {
        panic!("{NO_SCOPE_MSG}");
    }
}

/// Whether the owning layout runs with debug mode on.
pub fn debug_mode_active() -> bool {
    with_runtime(|runtime| runtime.debug_mode()).unwrap_or(false)
}

/// Attach a debug annotation to the current component. Only stored when
/// debug mode is enabled.
pub fn attach_debug_value(value: String) {
    if debug_mode_active() {
        let _ = with_current_scope(|scope| {
            *scope.debug_value.borrow_mut() = Some(value);
        });
    }
}
