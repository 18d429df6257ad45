use crate::error::ChannelError;
use async_trait::async_trait;

/// Ordered, bidirectional text-frame stream of one client.
///
/// `receive` must be cancel safe: the connection driver races it against
/// the outbound queue.
#[async_trait]
pub trait ConnectionChannel: Send {
    /// Next inbound frame, or `None` once the channel is closed.
    async fn receive(&mut self) -> Option<String>;

    async fn send(&mut self, frame: String) -> Result<(), ChannelError>;

    async fn close(&mut self);
}
