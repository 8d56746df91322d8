use lattice_core::prelude::{try_consume_context, use_hook, Connection, Location, ScopeMap};

/// The connection record for the client this layout serves.
///
/// Backends install one with `Layout::with_root_context`; calling this hook
/// in a layout without one is a wiring error and fails the render.
pub fn use_connection() -> Connection {
    match use_hook(try_consume_context::<Connection>) {
        Some(connection) => connection,
        None => panic!(
            "no Connection available; the backend must provide one via Layout::with_root_context"
        ),
    }
}

/// The path the client connected under.
pub fn use_location() -> Location {
    use_connection().location
}

/// The backend's arbitrary per-connection value map.
pub fn use_scope() -> ScopeMap {
    use_connection().scope
}
