//! The layout's event table.
//!
//! Every listener in an emitted model is registered here under an opaque
//! [`HandlerId`]. IDs are unique within one layout and stable for as long as
//! the owning element stays mounted with that event name; unmounting a scope
//! releases all of its IDs. A late event whose target has already been
//! released is dropped.

use crate::scopes::ScopeId;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// A layout-unique opaque name for one registered event callback. Rendered
/// as a decimal string on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl HandlerId {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok().map(HandlerId)
    }
}

/// Marker trait so listener closures can return either nothing or a future.
/// A returned future is spawned onto the layout's task queue, letting the
/// handler continue cooperatively after its synchronous prefix.
pub trait EventReturn<Marker>: Sized {
    fn spawn(self) {}
}

impl EventReturn<()> for () {}

/// Marker for async listener closures.
pub struct AsyncMarker;

impl<F> EventReturn<AsyncMarker> for F
where
    F: Future<Output = ()> + 'static,
{
    fn spawn(self) {
        crate::tasks::spawn(self);
    }
}

/// An erased event callback. Cheap to clone; the same callback may be
/// re-registered under a stable ID on every re-render of its element.
#[derive(Clone)]
pub struct ListenerCallback {
    inner: Rc<RefCell<dyn FnMut(Vec<Value>)>>,
}

impl ListenerCallback {
    pub fn new<F, Marker, R>(mut callback: F) -> Self
    where
        F: FnMut(Vec<Value>) -> R + 'static,
        R: EventReturn<Marker>,
        Marker: 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(move |data: Vec<Value>| {
                callback(data).spawn();
            })),
        }
    }

    pub(crate) fn call(&self, data: Vec<Value>) {
        (self.inner.borrow_mut())(data);
    }
}

impl fmt::Debug for ListenerCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerCallback").finish()
    }
}

pub(crate) struct RegisteredHandler {
    pub scope: ScopeId,
    pub callback: ListenerCallback,
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

/// The table of live handlers for one layout.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: FxHashMap<u64, RegisteredHandler>,
    next_id: u64,
}

impl HandlerRegistry {
    pub fn allocate(&mut self, handler: RegisteredHandler) -> HandlerId {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.insert(id, handler);
        HandlerId(id)
    }

    /// Refresh the callback registered under a retained ID. The wire-visible
    /// target stays the same while the closure (which captured last render's
    /// state) is swapped for the fresh one.
    pub fn update(&mut self, id: HandlerId, handler: RegisteredHandler) {
        self.handlers.insert(id.0, handler);
    }

    pub fn release(&mut self, id: HandlerId) {
        self.handlers.remove(&id.0);
    }

    pub fn get(&self, id: HandlerId) -> Option<&RegisteredHandler> {
        self.handlers.get(&id.0)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}
