use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveViewError {
    /// The client went away. The renderer unmounts the layout (or, behind a
    /// shared renderer, just this client's queue) and returns.
    #[error("client disconnected")]
    Disconnected,

    #[error("transport failure: {0}")]
    Transport(String),
}

#[cfg(feature = "axum")]
impl From<axum::Error> for LiveViewError {
    fn from(err: axum::Error) -> Self {
        LiveViewError::Transport(err.to_string())
    }
}
