//! A counter served over axum. Run with:
//!
//! ```sh
//! cargo run --example axum --features axum
//! ```

use lattice_core::prelude::*;
use lattice_hooks::{to_owned, use_state};
use lattice_html::prelude::*;
use lattice_html::{button, div, h1};
use lattice_liveview::adapters::LiveViewApp;
use lattice_liveview::{bootstrap_html, LiveViewConfig};

fn app(_: ()) -> Element {
    let count = use_state(|| 0);

    Some(
        div()
            .child(h1().child(format!("Count: {}", count.get())))
            .child(
                button()
                    .on("click", {
                        to_owned![count];
                        move |_| count.modify(|n| n + 1)
                    })
                    .child("Up"),
            )
            .child(
                button()
                    .on("click", {
                        to_owned![count];
                        move |_| count.modify(|n| n - 1)
                    })
                    .child("Down"),
            )
            .build(),
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = LiveViewConfig::default().with_debug_mode(true);
    println!("{}", bootstrap_html(&config));

    let router = LiveViewApp::new(app)
        .with_config(config)
        .with_static_dir("./static")
        .into_router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3030")
        .await
        .expect("bind dev server");
    println!("listening on http://127.0.0.1:3030");
    axum::serve(listener, router).await.expect("serve");
}
