//! Cooperative tasks owned by a layout.
//!
//! Event handlers and effects may hand the layout futures to drive; they are
//! polled from [`Layout::wait_for_work`](crate::Layout::wait_for_work) on the
//! same single-threaded scheduler that renders components. Dropping the
//! layout cancels everything still pending.

use crate::runtime::Runtime;
use crate::scopes::ScopeId;
use futures_channel::mpsc::UnboundedSender;
use futures_util::task::ArcWake;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::Waker;

/// A handle to a spawned task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Task(pub usize);

/// Wakeups routed through the layout's scheduler channel.
#[derive(Clone, Copy, Debug)]
pub enum SchedulerMsg {
    /// A scope asked to be re-rendered.
    Immediate(ScopeId),
    /// A spawned task's waker fired.
    TaskNotified(Task),
}

pub(crate) struct LocalTask {
    pub future: Rc<RefCell<Pin<Box<dyn Future<Output = ()>>>>>,
    pub waker: Waker,
}

pub(crate) struct LocalTaskWaker {
    pub id: Task,
    pub tx: UnboundedSender<SchedulerMsg>,
}

impl ArcWake for LocalTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        // The receiving layout may already be gone; that just means the
        // wakeup has nowhere to land.
        let _ = arc_self.tx.unbounded_send(SchedulerMsg::TaskNotified(arc_self.id));
    }
}

/// Spawn a future onto the current layout.
///
/// Must be called from inside a render or an event handler; the task is
/// polled between renders and cancelled when the layout is dropped.
pub fn spawn(fut: impl Future<Output = ()> + 'static) -> Task {
    match Runtime::current() {
        Some(runtime) => runtime.spawn_task(Box::pin(fut)),
        None => panic!("`spawn` called outside of a component render or event handler"),
    }
}
