#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod modules;
pub mod pool;
pub mod renderer;
pub mod shared;
pub mod socket;

pub mod adapters {
    #[cfg(feature = "axum")]
    pub mod axum_adapter;

    #[cfg(feature = "axum")]
    pub use self::axum_adapter::{axum_socket, LiveViewApp};
}

pub use config::LiveViewConfig;
pub use error::LiveViewError;
pub use modules::ModuleRegistry;
pub use pool::LiveViewPool;
pub use renderer::run_layout;
pub use shared::{shared_renderer, SharedHandle};
pub use socket::LiveViewSocket;

/// The HTML page that boots the thin client: the serialized configuration
/// plus a module script loading the client bundle from the static assets.
pub fn bootstrap_html(config: &LiveViewConfig) -> String {
    let config_json =
        serde_json::to_string(config).expect("liveview config serializes infallibly");
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8" /></head>
<body>
<div id="app"></div>
<script type="module">
  window.__LATTICE_CONFIG__ = {config_json};
  import("/static/client.js").then((client) => client.mount(document.getElementById("app")));
</script>
</body>
</html>"#
    )
}
