//! Thread-pinned execution for layouts.
//!
//! Layouts are single-threaded by design: scopes, hooks, and handler
//! callbacks are all `!Send`. The pool spawns each renderer loop pinned to
//! one worker thread, which is exactly the cooperative model the engine
//! assumes.

use crate::error::LiveViewError;
use crate::renderer::run_layout;
use crate::socket::LiveViewSocket;
use lattice_core::{Component, Layout};
use tokio_util::task::LocalPoolHandle;

pub struct LiveViewPool {
    pool: LocalPoolHandle,
}

impl Default for LiveViewPool {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveViewPool {
    pub fn new() -> Self {
        Self::with_threads(std::thread::available_parallelism().map(Into::into).unwrap_or(1))
    }

    pub fn with_threads(threads: usize) -> Self {
        Self {
            pool: LocalPoolHandle::new(threads.max(1)),
        }
    }

    /// Serve one connection with a fresh layout for `app`.
    pub async fn launch<S>(&self, socket: S, app: Component<()>) -> Result<(), LiveViewError>
    where
        S: LiveViewSocket + Send,
    {
        self.launch_with(socket, move || Layout::new(app)).await
    }

    /// Serve one connection with a layout built on the pinned thread. The
    /// builder is where per-connection context gets attached:
    ///
    /// ```rust, ignore
    /// pool.launch_with(socket, move || {
    ///     Layout::new(app).with_root_context(Connection::new(location))
    /// })
    /// ```
    pub async fn launch_with<S, F>(&self, socket: S, make_layout: F) -> Result<(), LiveViewError>
    where
        S: LiveViewSocket + Send,
        F: FnOnce() -> Layout + Send + 'static,
    {
        match self
            .pool
            .spawn_pinned(move || run_layout(make_layout(), socket))
            .await
        {
            Ok(result) => result,
            Err(join_err) => Err(LiveViewError::Transport(join_err.to_string())),
        }
    }
}
