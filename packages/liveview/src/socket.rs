//! The transport seam.
//!
//! A [`LiveViewSocket`] is whatever a web framework's WebSocket looks like
//! once mapped to text frames: a stream of incoming messages plus a sink of
//! outgoing ones. Adapters live behind feature flags; anything satisfying
//! the bound plugs in.

use crate::error::LiveViewError;
use futures_util::{Sink, Stream};

/// One client connection, as the renderer loop consumes it.
pub trait LiveViewSocket:
    Stream<Item = Result<String, LiveViewError>>
    + Sink<String, Error = LiveViewError>
    + Unpin
    + 'static
{
}

impl<S> LiveViewSocket for S where
    S: Stream<Item = Result<String, LiveViewError>>
        + Sink<String, Error = LiveViewError>
        + Unpin
        + 'static
{
}
