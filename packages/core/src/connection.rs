//! Per-connection metadata exposed to components.
//!
//! Backends provide one [`Connection`] per client through
//! [`Layout::with_root_context`](crate::Layout::with_root_context); the
//! `use_connection` / `use_location` / `use_scope` hooks read it back out.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::rc::Rc;

/// The path the client connected under.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The path portion, always starting with `/`.
    pub pathname: String,
    /// The raw query string, without the leading `?`. Empty when absent.
    pub search: String,
}

impl Location {
    /// Split a request target like `/inventory?page=2` into its parts.
    pub fn parse(target: &str) -> Self {
        match target.split_once('?') {
            Some((pathname, search)) => Self {
                pathname: pathname.to_string(),
                search: search.to_string(),
            },
            None => Self {
                pathname: target.to_string(),
                search: String::new(),
            },
        }
    }
}

/// Arbitrary per-connection values a backend wants to expose, e.g. session
/// data pulled off the upgrade request.
pub type ScopeMap = Rc<serde_json::Map<String, serde_json::Value>>;

/// Read-only metadata about the client connection a layout serves.
#[derive(Clone)]
pub struct Connection {
    pub location: Location,
    pub scope: ScopeMap,
    carrier: Option<Rc<dyn Any>>,
}

impl Connection {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            scope: Rc::new(serde_json::Map::new()),
            carrier: None,
        }
    }

    pub fn with_scope(mut self, scope: serde_json::Map<String, serde_json::Value>) -> Self {
        self.scope = Rc::new(scope);
        self
    }

    /// Attach the backend's transport handle. The type is backend-specific;
    /// components downcast it with [`Connection::carrier`].
    pub fn with_carrier<T: 'static>(mut self, carrier: T) -> Self {
        self.carrier = Some(Rc::new(carrier));
        self
    }

    pub fn carrier<T: 'static>(&self) -> Option<Rc<T>> {
        self.carrier.clone()?.downcast::<T>().ok()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("location", &self.location)
            .field("scope", &self.scope)
            .field("carrier", &self.carrier.is_some())
            .finish()
    }
}
