use crate::error::ChannelError;
use crate::transport::ConnectionChannel;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

/// [`ConnectionChannel`] over an upgraded axum WebSocket.
pub struct WsChannel {
    sender: SplitSink<WebSocket, Message>,
    receiver: SplitStream<WebSocket>,
}

impl WsChannel {
    pub fn new(socket: WebSocket) -> Self {
        let (sender, receiver) = socket.split();
        Self { sender, receiver }
    }
}

#[async_trait]
impl ConnectionChannel for WsChannel {
    async fn receive(&mut self) -> Option<String> {
        loop {
            match self.receiver.next().await? {
                Ok(Message::Text(text)) => return Some(text.as_str().to_owned()),
                Ok(Message::Binary(_)) => {
                    warn!("Binary frame on signaling socket, closing");
                    return None;
                }
                Ok(Message::Close(_)) => return None,
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    debug!("WebSocket receive error: {}", e);
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, frame: String) -> Result<(), ChannelError> {
        self.sender
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.sender.close().await;
    }
}
