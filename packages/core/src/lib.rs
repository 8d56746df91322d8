#![doc = include_str!("../README.md")]

pub(crate) mod any_props;
pub(crate) mod connection;
pub(crate) mod diff;
pub(crate) mod error;
pub(crate) mod events;
pub(crate) mod layout;
pub(crate) mod model;
pub(crate) mod nodes;
pub(crate) mod protocol;
pub(crate) mod runtime;
pub(crate) mod scopes;
pub(crate) mod serialize;
pub(crate) mod tasks;

pub(crate) mod innerlude {
    pub use crate::any_props::RenderFnId;
    pub use crate::connection::{Connection, Location, ScopeMap};
    pub use crate::diff::DirtyScope;
    pub use crate::error::{LayoutError, ProtocolError};
    pub use crate::events::{AsyncMarker, EventReturn, HandlerId, ListenerCallback};
    pub use crate::layout::Layout;
    pub use crate::model::{
        join_path, parse_path, validate_model, EventTarget, ImportSourceModel, Model, ModelChild,
    };
    pub use crate::nodes::{
        component, keyed_component, AttributeValue, Component, Element, ImportSource, Listener,
        SourceType, VComponent, VElement, VNode,
    };
    pub use crate::protocol::{LayoutEvent, LayoutMessage, LayoutUpdate, ReconnectOptions};
    pub use crate::runtime::{Runtime, RuntimeGuard};
    pub use crate::scopes::{
        attach_debug_value, current_scope_id, debug_mode_active, provide_context, push_drop_callback,
        push_effect, schedule_update, schedule_update_any, try_consume_context, use_hook, ScopeId,
        ScopeState,
    };
    pub use crate::tasks::{spawn, SchedulerMsg, Task};
}

pub use innerlude::*;

pub mod prelude {
    pub use crate::connection::{Connection, Location, ScopeMap};
    pub use crate::events::{EventReturn, ListenerCallback};
    pub use crate::layout::Layout;
    pub use crate::nodes::{component, keyed_component, Component, Element, VNode};
    pub use crate::scopes::{
        attach_debug_value, current_scope_id, debug_mode_active, provide_context, push_drop_callback,
        push_effect, schedule_update, schedule_update_any, try_consume_context, use_hook, ScopeId,
    };
    pub use crate::tasks::spawn;
}
