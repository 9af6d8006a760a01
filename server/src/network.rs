//! HTTP layer: routing, CORS and the listener lifecycle

use crate::buffer::ActionBuffer;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::extract::JsonObject;
use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info};
use shared::{
    StatusResponse, UpdateResponse, ACTION_PATH, HEALTH_MESSAGE, HEALTH_PATH, REGISTER_PATH,
    UPDATES_PATH,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{AllowHeaders, CorsLayer};

/// State shared by every request handler
#[derive(Clone, Default)]
pub struct AppState {
    pub actions: Arc<RwLock<ActionBuffer>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builds the router with all relay routes and the CORS policy for `origin`
pub fn build_router(state: AppState, origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(ACTION_PATH, post(push_action))
        .route(UPDATES_PATH, get(poll_updates))
        .route(REGISTER_PATH, post(register_player))
        .with_state(state)
        .layer(cors)
}

/// Plain-text liveness check
async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Stamps and buffers an action payload
pub async fn push_action(
    State(state): State<AppState>,
    JsonObject(payload): JsonObject,
) -> Json<StatusResponse> {
    let buffered = {
        let mut actions = state.actions.write().await;
        actions.append(payload);
        actions.len()
    };
    info!("Buffered action ({} in buffer)", buffered);

    Json(StatusResponse::ok())
}

/// Reports the most recent action, if any
pub async fn poll_updates(State(state): State<AppState>) -> Json<UpdateResponse> {
    let update = {
        let actions = state.actions.read().await;
        UpdateResponse::from_latest(actions.latest())
    };
    debug!("Poll answered with {:?}", update.message);

    Json(update)
}

/// Acknowledges a player registration without storing it
pub async fn register_player(JsonObject(player): JsonObject) -> Json<StatusResponse> {
    info!(
        "Registered player: {}",
        serde_json::Value::Object(player)
    );

    Json(StatusResponse::registered())
}

/// Relay server bound to a listening socket
pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Validates the configuration and binds the listener
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        Self::bind_with_state(config, AppState::new()).await
    }

    /// Like `bind`, serving an existing state
    pub async fn bind_with_state(
        config: &ServerConfig,
        state: AppState,
    ) -> Result<Self, ServerError> {
        let addr = config.bind_addr()?;
        let origin = config.cors_origin()?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);
        info!("Accepting browser requests from {}", config.allowed_origin);

        Ok(Server {
            listener,
            router: build_router(state, origin),
            local_addr,
        })
    }

    /// Address actually bound, useful when the configured port is 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until the process is stopped
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server started successfully");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}
