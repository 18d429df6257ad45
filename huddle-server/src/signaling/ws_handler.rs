use crate::config::ServerConfig;
use crate::signaling::{SignalingDispatcher, run_connection};
use crate::transport::WsChannel;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: SignalingDispatcher,
    pub config: Arc<ServerConfig>,
}

pub fn router(dispatcher: SignalingDispatcher, config: ServerConfig) -> Router {
    let ws_path = config.ws_path.clone();
    let state = AppState {
        dispatcher,
        config: Arc::new(config),
    };

    Router::new()
        .route(&ws_path, get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    dispatcher: SignalingDispatcher,
    config: ServerConfig,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Signaling server listening on ws://{}{}", addr, config.ws_path);
    }
    axum::serve(listener, router(dispatcher, config)).await
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let AppState { dispatcher, config } = state;

    ws.max_message_size(config.max_frame_bytes)
        .on_failed_upgrade(|e| warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| {
            run_connection(dispatcher, WsChannel::new(socket), config.queue_capacity)
        })
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let registry = state.dispatcher.registry();
    Json(json!({
        "status": "ok",
        "rooms": registry.room_count(),
        "participants": registry.participant_total().await,
    }))
}
