//! Server configuration, serialized into the client bootstrap.

use lattice_core::ReconnectOptions;
use serde::{Deserialize, Serialize};

/// The recognized configuration for a liveview host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveViewConfig {
    /// Validate every emitted model, warn about unkeyed list-like siblings,
    /// and surface render errors into the UI. Off in production: error
    /// messages can leak secrets.
    pub debug_mode: bool,

    /// URL segment the transport and module endpoints are mounted under.
    pub url_prefix: String,

    /// Whether the host also serves the built client assets.
    pub serve_static_files: bool,

    /// Redirect `/` to the served index page.
    pub redirect_root_to_index: bool,

    pub reconnect: ReconnectOptions,
}

impl Default for LiveViewConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            url_prefix: "/_lattice".to_string(),
            serve_static_files: true,
            redirect_root_to_index: false,
            reconnect: ReconnectOptions::default(),
        }
    }
}

impl LiveViewConfig {
    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectOptions) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// The path the client dials for its WebSocket.
    pub fn ws_path(&self) -> String {
        format!("{}/ws", self.url_prefix)
    }

    /// The path prefix modules are fetched under.
    pub fn modules_path(&self) -> String {
        format!("{}/modules", self.url_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_as_camel_case() {
        let config = LiveViewConfig::default().with_url_prefix("/app");
        let raw = serde_json::to_string(&config).unwrap();
        assert!(raw.contains("urlPrefix"));
        assert!(raw.contains("maxIntervalMs"));
        let back: LiveViewConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, config);
    }
}
