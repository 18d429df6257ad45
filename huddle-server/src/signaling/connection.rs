use crate::signaling::{ConnectionId, Outbox, Session, SessionEvent, SignalingDispatcher};
use crate::transport::ConnectionChannel;
use huddle_core::ServerFrame;
use tracing::{error, info};

/// Serves one client until its channel closes.
///
/// Inbound frames are dispatched strictly in receive order. The
/// connection's outbound queue is drained here, so only this client
/// waits on its own socket. Closure runs the same leave path as an
/// explicit `leaveRoom`.
pub async fn run_connection<C>(dispatcher: SignalingDispatcher, mut channel: C, queue_capacity: usize)
where
    C: ConnectionChannel,
{
    let (outbox, mut outbound) = Outbox::new(ConnectionId::new(), queue_capacity);
    let mut session = Session::new(outbox);
    info!("New connection: {}", session.id());

    loop {
        tokio::select! {
            inbound = channel.receive() => match inbound {
                Some(text) => dispatcher.handle_event(&mut session, SessionEvent::Frame(text)).await,
                None => break,
            },
            Some(frame) = outbound.recv() => {
                if !send_frame(&mut channel, &frame).await {
                    break;
                }
            }
        }
    }

    dispatcher
        .handle_event(&mut session, SessionEvent::ChannelClosed)
        .await;
    channel.close().await;
    info!("Connection finished: {}", session.id());
}

async fn send_frame<C: ConnectionChannel>(channel: &mut C, frame: &ServerFrame) -> bool {
    let text = match frame.encode() {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to serialize outbound frame: {}", e);
            return true;
        }
    };
    channel.send(text).await.is_ok()
}
