//! The per-connection renderer loop.

use crate::error::LiveViewError;
use crate::socket::LiveViewSocket;
use futures_util::{SinkExt, StreamExt};
use lattice_core::{Layout, LayoutMessage};

enum Turn {
    Outgoing(String),
    Incoming(Option<Result<String, LiveViewError>>),
}

/// Drive one layout against one client until it disconnects.
///
/// Two arms cooperate on the same task: the layout's next update is
/// forwarded out, and incoming `layout-event` messages are delivered in.
/// The select is biased toward the render arm so every event's updates are
/// flushed before the next event is taken, keeping updates in apply order
/// and events in send order.
///
/// When the socket closes, the layout is unmounted: cleanup effects run in
/// reverse creation order and every handler registration is released.
pub async fn run_layout<S>(mut layout: Layout, mut socket: S) -> Result<(), LiveViewError>
where
    S: LiveViewSocket,
{
    let initial = layout.rebuild();
    socket.send(initial.to_message().to_json()).await?;

    let result = loop {
        let turn = tokio::select! {
            biased;
            update = layout.render() => Turn::Outgoing(update.to_message().to_json()),
            incoming = socket.next() => Turn::Incoming(incoming),
        };

        match turn {
            Turn::Outgoing(raw) => {
                if let Err(err) = socket.send(raw).await {
                    break Err(err);
                }
            }
            Turn::Incoming(None) => break Ok(()),
            Turn::Incoming(Some(Err(err))) => break Err(err),
            Turn::Incoming(Some(Ok(raw))) => dispatch(&mut layout, &raw),
        }
    };

    layout.unmount();
    result
}

/// Parse one incoming frame and route it. Garbage is logged and discarded;
/// the connection stays up.
fn dispatch(layout: &mut Layout, raw: &str) {
    match LayoutMessage::parse(raw) {
        Ok(LayoutMessage::Event(event)) => layout.deliver(event),
        Ok(LayoutMessage::Update(_)) => {
            tracing::warn!("client sent a layout-update; discarding");
        }
        Err(err) => {
            tracing::warn!("discarding unparseable message: {err}");
        }
    }
}
