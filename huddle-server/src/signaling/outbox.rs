use crate::signaling::ConnectionId;
use huddle_core::{RpcResponse, ServerFrame};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outbound lanes of one connection.
///
/// Notifications go through a bounded queue and are dropped when a client
/// falls behind. Replies to the client's own requests use a separate lane
/// that never drops, so every request is answered. Neither push waits: both
/// lanes are drained by the connection's own driver.
#[derive(Debug, Clone)]
pub struct Outbox {
    connection: ConnectionId,
    replies: mpsc::UnboundedSender<ServerFrame>,
    events: mpsc::Sender<ServerFrame>,
}

/// Receiving side of an [`Outbox`], owned by the connection driver.
#[derive(Debug)]
pub struct Outbound {
    replies: mpsc::UnboundedReceiver<ServerFrame>,
    events: mpsc::Receiver<ServerFrame>,
}

impl Outbox {
    pub fn new(connection: ConnectionId, capacity: usize) -> (Self, Outbound) {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                connection,
                replies: replies_tx,
                events: events_tx,
            },
            Outbound {
                replies: replies_rx,
                events: events_rx,
            },
        )
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Queues a notification. Returns whether the frame was queued.
    pub fn push(&self, frame: ServerFrame) -> bool {
        match self.events.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Outbound queue full for connection {}, dropping frame", self.connection);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Outbound queue closed for connection {} (disconnected)", self.connection);
                false
            }
        }
    }

    /// Queues the reply to one of this connection's requests. Fails only
    /// once the connection is gone.
    pub fn reply(&self, response: RpcResponse) -> bool {
        if self.replies.send(ServerFrame::Response(response)).is_err() {
            debug!("Reply lane closed for connection {} (disconnected)", self.connection);
            return false;
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

impl Outbound {
    /// Next frame to write. Pending replies go before notifications.
    ///
    /// Cancel safe. Returns `None` once every [`Outbox`] handle is dropped
    /// and both lanes are drained.
    pub async fn recv(&mut self) -> Option<ServerFrame> {
        tokio::select! {
            biased;
            Some(frame) = self.replies.recv() => Some(frame),
            Some(frame) = self.events.recv() => Some(frame),
            else => None,
        }
    }
}
