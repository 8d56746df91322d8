//! The shared renderer: one layout, many clients.
//!
//! Every connection receives the current full model as its initial sync and
//! then follows the live broadcast of patches. A client that disconnects
//! (or falls too far behind the broadcast) costs the layout nothing but its
//! output queue; the layout itself stays mounted until the renderer is
//! dropped.

use crate::error::LiveViewError;
use crate::socket::LiveViewSocket;
use futures_util::{SinkExt, StreamExt};
use lattice_core::{Layout, LayoutEvent, LayoutMessage};
use tokio::sync::{broadcast, mpsc, oneshot};

const BROADCAST_CAPACITY: usize = 64;

enum SharedCommand {
    Join(oneshot::Sender<JoinReply>),
    Event(LayoutEvent),
}

struct JoinReply {
    initial: String,
    updates: broadcast::Receiver<String>,
}

/// A clonable handle for attaching clients to a shared layout.
#[derive(Clone)]
pub struct SharedHandle {
    commands: mpsc::UnboundedSender<SharedCommand>,
}

enum DriverTurn {
    Update(String),
    Command(Option<SharedCommand>),
}

/// Start a shared renderer around a layout. The returned future must run on
/// the thread the layout was built on (see `LiveViewPool`); the handle may
/// travel anywhere. The driver exits, unmounting the layout, once every
/// handle is gone.
pub fn shared_renderer(
    mut layout: Layout,
) -> (SharedHandle, impl std::future::Future<Output = ()>) {
    let (commands, mut command_rx) = mpsc::unbounded_channel();
    let (updates_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

    let driver = {
        let updates_tx = updates_tx.clone();
        async move {
            let initial = layout.rebuild();
            let _ = updates_tx.send(initial.to_message().to_json());

            loop {
                let turn = tokio::select! {
                    biased;
                    update = layout.render() => {
                        DriverTurn::Update(update.to_message().to_json())
                    }
                    command = command_rx.recv() => DriverTurn::Command(command),
                };

                match turn {
                    DriverTurn::Update(raw) => {
                        let _ = updates_tx.send(raw);
                    }
                    DriverTurn::Command(None) => break,
                    DriverTurn::Command(Some(SharedCommand::Join(reply))) => {
                        let _ = reply.send(JoinReply {
                            initial: layout.full_update().to_message().to_json(),
                            updates: updates_tx.subscribe(),
                        });
                    }
                    DriverTurn::Command(Some(SharedCommand::Event(event))) => {
                        layout.deliver(event);
                    }
                }
            }

            layout.unmount();
        }
    };

    (SharedHandle { commands }, driver)
}

enum ClientTurn {
    Update(Result<String, broadcast::error::RecvError>),
    Incoming(Option<Result<String, LiveViewError>>),
}

impl SharedHandle {
    /// Serve one client from the shared layout until it disconnects.
    pub async fn serve<S>(&self, mut socket: S) -> Result<(), LiveViewError>
    where
        S: LiveViewSocket,
    {
        let JoinReply {
            initial,
            mut updates,
        } = self.join().await?;
        socket.send(initial).await?;

        loop {
            let turn = tokio::select! {
                update = updates.recv() => ClientTurn::Update(update),
                incoming = socket.next() => ClientTurn::Incoming(incoming),
            };

            match turn {
                ClientTurn::Update(Ok(raw)) => socket.send(raw).await?,
                // Fell behind the broadcast: resync from the full model and
                // pick the stream back up.
                ClientTurn::Update(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::debug!(skipped, "client lagged; resyncing");
                    let reply = self.join().await?;
                    updates = reply.updates;
                    socket.send(reply.initial).await?;
                }
                ClientTurn::Update(Err(broadcast::error::RecvError::Closed)) => return Ok(()),
                ClientTurn::Incoming(None) => return Ok(()),
                ClientTurn::Incoming(Some(Err(err))) => return Err(err),
                ClientTurn::Incoming(Some(Ok(raw))) => self.dispatch(&raw),
            }
        }
    }

    async fn join(&self) -> Result<JoinReply, LiveViewError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(SharedCommand::Join(reply_tx))
            .map_err(|_| LiveViewError::Disconnected)?;
        reply_rx.await.map_err(|_| LiveViewError::Disconnected)
    }

    fn dispatch(&self, raw: &str) {
        match LayoutMessage::parse(raw) {
            Ok(LayoutMessage::Event(event)) => {
                let _ = self.commands.send(SharedCommand::Event(event));
            }
            Ok(LayoutMessage::Update(_)) => {
                tracing::warn!("client sent a layout-update; discarding");
            }
            Err(err) => {
                tracing::warn!("discarding unparseable message: {err}");
            }
        }
    }
}
