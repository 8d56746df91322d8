#![doc = include_str!("../README.md")]

pub mod backend;
pub mod error;
pub mod events;
pub mod mirror;
pub mod modules;
pub mod reconciler;
pub mod reconnect;
pub mod testing;

pub use backend::{DomBackend, NodeId, ScriptCleanup};
pub use error::ClientError;
pub use events::{event_message, typed_event_message, ConnectionEvent};
pub use mirror::Mirror;
pub use modules::{
    sanitize_module_model, Module, ModuleBinding, ModuleChannel, ModuleLoader,
};
pub use reconciler::{ClientOptions, Reconciler};
pub use reconnect::ReconnectSchedule;
