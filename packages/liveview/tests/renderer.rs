//! Renderer loop semantics over a scripted socket: ordering, protocol
//! garbage, disconnect cleanup, and the shared renderer's initial sync.

use futures_util::{Sink, Stream};
use lattice_core::prelude::*;
use lattice_hooks::{use_effect, use_state};
use lattice_html::button;
use lattice_liveview::{run_layout, shared_renderer, LiveViewError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// A socket fed from a script: yields each queued frame, then closes.
struct TestSocket {
    incoming: VecDeque<String>,
    sent: Rc<RefCell<Vec<String>>>,
}

impl TestSocket {
    fn new(incoming: impl IntoIterator<Item = String>) -> (Self, Rc<RefCell<Vec<String>>>) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                incoming: incoming.into_iter().collect(),
                sent: sent.clone(),
            },
            sent,
        )
    }
}

impl Stream for TestSocket {
    type Item = Result<String, LiveViewError>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().incoming.pop_front().map(Ok))
    }
}

impl Sink<String> for TestSocket {
    type Error = LiveViewError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: String) -> Result<(), Self::Error> {
        self.get_mut().sent.borrow_mut().push(item);
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}

fn counter(_: ()) -> Element {
    let count = use_state(|| 0);
    let n = count.get();
    Some(
        button()
            .on("click", move |_| count.set(n + 1))
            .child(format!("count:{n}"))
            .build(),
    )
}

fn click_event() -> String {
    // The first handler a fresh layout registers gets target "0".
    r#"{"type":"layout-event","target":"0","data":[]}"#.to_string()
}

#[tokio::test]
async fn updates_are_emitted_in_event_order() {
    let (socket, sent) = TestSocket::new([click_event(), click_event(), click_event()]);
    run_layout(Layout::new(counter), socket).await.unwrap();

    let sent = sent.borrow();
    assert_eq!(sent.len(), 4, "initial sync plus one update per event");
    assert!(sent[0].contains("count:0"));
    assert!(sent[0].contains(r#""target":"0""#));
    assert!(sent[1].contains("count:1"));
    assert!(sent[2].contains("count:2"));
    assert!(sent[3].contains("count:3"));
}

#[tokio::test]
async fn protocol_garbage_is_discarded_without_killing_the_connection() {
    let (socket, sent) = TestSocket::new([
        "not json at all".to_string(),
        r#"{"type":"mystery"}"#.to_string(),
        r#"{"type":"layout-update","path":"","model":{"tagName":"div"}}"#.to_string(),
        click_event(),
    ]);
    run_layout(Layout::new(counter), socket).await.unwrap();

    let sent = sent.borrow();
    // The garbage produced nothing; the real event still landed.
    assert_eq!(sent.len(), 2);
    assert!(sent[1].contains("count:1"));
}

#[tokio::test]
async fn disconnect_unmounts_the_layout() {
    #[derive(Clone)]
    struct Props {
        log: Rc<RefCell<Vec<String>>>,
    }
    impl PartialEq for Props {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.log, &other.log)
        }
    }

    fn app(props: Props) -> Element {
        let log = props.log.clone();
        use_effect(move || {
            log.borrow_mut().push("mounted".to_string());
            let log = log.clone();
            move || log.borrow_mut().push("unmounted".to_string())
        });
        Some(button().child("hi").build())
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let (socket, _sent) = TestSocket::new([]);
    run_layout(
        Layout::new_with_props(app, Props { log: log.clone() }),
        socket,
    )
    .await
    .unwrap();

    assert_eq!(*log.borrow(), ["mounted", "unmounted"]);
}

#[tokio::test]
async fn shared_renderer_syncs_late_joiners_to_current_state() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let (handle, driver) = shared_renderer(Layout::new(counter));
            let driver = tokio::task::spawn_local(driver);

            // First client clicks once, then disconnects.
            let (socket, first_sent) = TestSocket::new([click_event()]);
            handle.serve(socket).await.unwrap();

            // Second client joins after the event: its initial sync carries
            // the already-advanced state.
            let (socket, second_sent) = TestSocket::new([]);
            handle.serve(socket).await.unwrap();

            assert!(first_sent.borrow()[0].contains("count:0"));
            let second = second_sent.borrow();
            assert!(second[0].contains("count:1"));

            // Closing the last handle shuts the layout down.
            drop(handle);
            driver.await.unwrap();
        })
        .await;
}
