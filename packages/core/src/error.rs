use thiserror::Error;

/// Failures raised while a layout renders components or dispatches events.
///
/// These are logged and contained: the layout keeps serving after any of
/// them. Hook misuse and render panics replace the offending subtree; a
/// failed event handler still counts as delivered.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("hook called outside of a component render")]
    HookOutOfContext,

    #[error("hooks must be called in the same order on every render: {0}")]
    HookOrderViolation(String),

    #[error("component `{name}` failed to render: {message}")]
    RenderFailure { name: String, message: String },

    #[error("event handler for target `{target}` failed: {message}")]
    EventHandlerFailure { target: String, message: String },
}

/// Failures decoding or addressing wire messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid model path `{0}`")]
    InvalidPath(String),

    #[error("model path `{path}` does not resolve to a node")]
    Unresolvable { path: String },
}
