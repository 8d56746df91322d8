//! The per-layout runtime and the thread-local stack that makes hooks work.
//!
//! Hooks are plain functions: they find "the component currently rendering"
//! through a stack of active runtimes kept in a thread local. Each layout
//! owns exactly one [`Runtime`]; pushing a [`RuntimeGuard`] scopes every
//! hook call inside it to that layout, so concurrent layouts on one thread
//! never interfere.

use crate::scopes::{ScopeId, ScopeState};
use crate::tasks::{LocalTask, LocalTaskWaker, SchedulerMsg, Task};
use futures_channel::mpsc::UnboundedSender;
use futures_util::task::waker;
use slab::Slab;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

thread_local! {
    static RUNTIMES: RefCell<Vec<Rc<Runtime>>> = const { RefCell::new(Vec::new()) };
}

/// Pushes a runtime onto the stack.
pub(crate) fn push_runtime(runtime: Rc<Runtime>) {
    RUNTIMES.with(|stack| stack.borrow_mut().push(runtime));
}

/// Pops a runtime off the stack.
pub(crate) fn pop_runtime() {
    RUNTIMES.with(|stack| stack.borrow_mut().pop());
}

/// Runs a function with the current runtime.
pub(crate) fn with_runtime<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&Rc<Runtime>) -> R,
{
    RUNTIMES.with(|stack| stack.borrow().last().map(f))
}

/// Runs a function with the currently rendering scope.
pub(crate) fn with_current_scope<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&ScopeState) -> R,
{
    with_runtime(|runtime| {
        let id = runtime.current_scope_id()?;
        runtime.with_scope_state(id, f)
    })
    .flatten()
}

/// Everything the hooks machinery needs to reach from inside a render:
/// the scope arena, the stack of scopes currently rendering, spawned tasks,
/// and the scheduler channel that wakes the layout.
pub struct Runtime {
    pub(crate) scopes: RefCell<Slab<ScopeState>>,

    // We use this to track the scope a hook call belongs to
    pub(crate) scope_stack: RefCell<Vec<ScopeId>>,

    pub(crate) tasks: RefCell<Slab<LocalTask>>,

    pub(crate) rendering: Cell<bool>,

    pub(crate) debug_mode: Cell<bool>,

    pub(crate) sender: UnboundedSender<SchedulerMsg>,
}

impl Runtime {
    pub(crate) fn new(sender: UnboundedSender<SchedulerMsg>) -> Rc<Self> {
        Rc::new(Self {
            scopes: RefCell::new(Slab::new()),
            scope_stack: RefCell::new(Vec::new()),
            tasks: RefCell::new(Slab::new()),
            rendering: Cell::new(false),
            debug_mode: Cell::new(false),
            sender,
        })
    }

    /// Get the current runtime, if a layout is active on this thread.
    pub fn current() -> Option<Rc<Self>> {
        RUNTIMES.with(|stack| stack.borrow().last().cloned())
    }

    /// Whether debug mode is enabled for this layout.
    pub fn debug_mode(&self) -> bool {
        self.debug_mode.get()
    }

    pub(crate) fn current_scope_id(&self) -> Option<ScopeId> {
        self.scope_stack.borrow().last().copied()
    }

    /// Call `f` with the current scope set to `id`.
    pub(crate) fn with_scope_on_stack<O>(&self, id: ScopeId, f: impl FnOnce() -> O) -> O {
        self.scope_stack.borrow_mut().push(id);
        let out = f();
        self.scope_stack.borrow_mut().pop();
        out
    }

    /// Borrow one scope's state for the duration of `f`. The slab stays
    /// immutably borrowed, so `f` must not create or remove scopes.
    pub(crate) fn with_scope_state<F, R>(&self, id: ScopeId, f: F) -> Option<R>
    where
        F: FnOnce(&ScopeState) -> R,
    {
        let scopes = self.scopes.borrow();
        scopes.get(id.0).map(f)
    }

    /// Walk from `scope` to the root looking for a context of type `T`.
    pub(crate) fn consume_context<T: Clone + 'static>(&self, scope: ScopeId) -> Option<T> {
        let scopes = self.scopes.borrow();
        let mut search = scopes.get(scope.0);
        while let Some(state) = search {
            if let Some(value) = state.context::<T>() {
                return Some(value);
            }
            search = state.parent.and_then(|parent| scopes.get(parent.0));
        }
        None
    }

    pub(crate) fn spawn_task(&self, future: Pin<Box<dyn Future<Output = ()>>>) -> Task {
        let mut tasks = self.tasks.borrow_mut();
        let entry = tasks.vacant_entry();
        let id = Task(entry.key());
        let task_waker = waker(Arc::new(LocalTaskWaker {
            id,
            tx: self.sender.clone(),
        }));
        entry.insert(LocalTask {
            future: Rc::new(RefCell::new(future)),
            waker: task_waker,
        });
        drop(tasks);

        // Kick the first poll through the scheduler so spawning from inside
        // a render does not re-enter the layout.
        let _ = self.sender.unbounded_send(SchedulerMsg::TaskNotified(id));
        id
    }

    /// Poll a task that signalled readiness. Completed tasks leave the slab.
    pub(crate) fn handle_task_wakeup(&self, id: Task) {
        let entry = {
            let tasks = self.tasks.borrow();
            tasks.get(id.0).map(|task| (task.future.clone(), task.waker.clone()))
        };
        let Some((future, task_waker)) = entry else {
            return;
        };

        let mut cx = Context::from_waker(&task_waker);
        let poll = future.borrow_mut().as_mut().poll(&mut cx);
        if let Poll::Ready(()) = poll {
            self.tasks.borrow_mut().try_remove(id.0);
        }
    }
}

/// A guard that makes `runtime` current for hook calls until dropped.
pub struct RuntimeGuard(());

impl RuntimeGuard {
    pub fn new(runtime: Rc<Runtime>) -> Self {
        push_runtime(runtime);
        Self(())
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        pop_runtime();
    }
}
