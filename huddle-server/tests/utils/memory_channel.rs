use async_trait::async_trait;
use huddle_server::{ChannelError, ConnectionChannel};
use tokio::sync::mpsc;

/// In-process `ConnectionChannel` standing in for a WebSocket.
pub struct MemoryChannel {
    /// Frames written by the test client.
    inbound: mpsc::UnboundedReceiver<String>,
    /// Frames written by the server.
    outbound: mpsc::UnboundedSender<String>,
}

impl MemoryChannel {
    /// Returns the channel plus the client's ends: a sender for requests and
    /// a receiver for everything the server writes.
    pub fn new() -> (
        Self,
        mpsc::UnboundedSender<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (client_tx, inbound) = mpsc::unbounded_channel();
        let (outbound, client_rx) = mpsc::unbounded_channel();
        (Self { inbound, outbound }, client_tx, client_rx)
    }
}

#[async_trait]
impl ConnectionChannel for MemoryChannel {
    async fn receive(&mut self) -> Option<String> {
        self.inbound.recv().await
    }

    async fn send(&mut self, frame: String) -> Result<(), ChannelError> {
        self.outbound.send(frame).map_err(|_| ChannelError::Closed)
    }

    async fn close(&mut self) {
        self.inbound.close();
    }
}
