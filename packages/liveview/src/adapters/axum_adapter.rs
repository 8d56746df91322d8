//! Axum glue: socket adapter, router builder, and the handlers behind the
//! transport and module endpoints.

use crate::config::LiveViewConfig;
use crate::error::LiveViewError;
use crate::modules::ModuleRegistry;
use crate::pool::LiveViewPool;
use crate::socket::LiveViewSocket;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{future, SinkExt, StreamExt};
use lattice_core::{Component, Connection, Layout, Location};
use std::path::PathBuf;
use std::sync::Arc;

/// Map an axum WebSocket onto the renderer's text-frame socket. Non-text
/// frames surface as empty strings, which the renderer logs and discards.
pub fn axum_socket(ws: WebSocket) -> impl LiveViewSocket {
    ws.map(transform_rx)
        .with(|message: String| future::ready(Ok::<Message, LiveViewError>(Message::Text(message))))
}

fn transform_rx(message: Result<Message, axum::Error>) -> Result<String, LiveViewError> {
    match message {
        Ok(Message::Text(text)) => Ok(text),
        Ok(_) => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}

#[derive(Clone)]
struct AppState {
    config: LiveViewConfig,
    modules: ModuleRegistry,
    pool: Arc<LiveViewPool>,
    app: Component<()>,
}

/// Builder for a complete liveview host: WebSocket endpoint, module
/// endpoint, and optionally the static client assets.
pub struct LiveViewApp {
    config: LiveViewConfig,
    modules: ModuleRegistry,
    pool: Arc<LiveViewPool>,
    app: Component<()>,
    static_dir: Option<PathBuf>,
}

impl LiveViewApp {
    pub fn new(app: Component<()>) -> Self {
        Self {
            config: LiveViewConfig::default(),
            modules: ModuleRegistry::new(),
            pool: Arc::new(LiveViewPool::new()),
            app,
            static_dir: None,
        }
    }

    pub fn with_config(mut self, config: LiveViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_pool(mut self, pool: Arc<LiveViewPool>) -> Self {
        self.pool = pool;
        self
    }

    /// Where the built client assets live when `serve_static_files` is on.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn into_router(self) -> Router {
        let prefix = self.config.url_prefix.clone();
        let serve_static = self.config.serve_static_files;
        let redirect_root = self.config.redirect_root_to_index;
        let static_dir = self.static_dir.clone();

        let state = AppState {
            config: self.config,
            modules: self.modules,
            pool: self.pool,
            app: self.app,
        };

        let mut router = Router::new()
            .route(&format!("{prefix}/ws"), get(ws_handler))
            .route(&format!("{prefix}/modules/:name"), get(module_handler))
            .with_state(state);

        if redirect_root {
            router = router.route("/", get(|| async { Redirect::temporary("/index.html") }));
        }

        if serve_static {
            if let Some(dir) = static_dir {
                router = router.fallback_service(tower_http::services::ServeDir::new(dir));
            }
        }

        router
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    uri: Uri,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let app = state.app;
        let debug_mode = state.config.debug_mode;
        let location = Location::parse(
            uri.path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/"),
        );

        let result = state
            .pool
            .launch_with(axum_socket(socket), move || {
                Layout::new(app)
                    .with_debug_mode(debug_mode)
                    .with_root_context(Connection::new(location))
            })
            .await;

        if let Err(err) = result {
            tracing::debug!("connection ended: {err}");
        }
    })
}

async fn module_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    match state.modules.get(&name) {
        Some(source) => (
            [(header::CONTENT_TYPE, "application/javascript")],
            source,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
