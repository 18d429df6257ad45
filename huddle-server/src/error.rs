use huddle_core::{ErrorKind, MediaKind, PeerId, RoomId, RpcError};
use thiserror::Error;

/// Failure of a single request. Never tears down the connection.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("participant {peer_id} not found in room {room_id}")]
    ParticipantNotFound { room_id: RoomId, peer_id: PeerId },

    #[error("room already exists: {0}")]
    RoomExists(RoomId),

    #[error("peer {peer_id} is already in room {room_id}")]
    PeerExists { room_id: RoomId, peer_id: PeerId },

    #[error("wrong secret for room {0}")]
    WrongSecret(RoomId),

    #[error("nickname {nickname:?} is already in use in room {room_id}")]
    NicknameTaken { room_id: RoomId, nickname: String },

    #[error("{0} is not allowed in this room")]
    MediaNotAllowed(MediaKind),

    #[error("only the room creator can {0}")]
    CreatorOnly(&'static str),

    #[error("not a participant of room {0}")]
    NotAMember(RoomId),

    #[error("peer {0} does not belong to this connection")]
    ForeignPeer(PeerId),
}

impl SignalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParams(_) => ErrorKind::InvalidParams,
            Self::MethodNotFound(_) => ErrorKind::MethodNotFound,
            Self::RoomNotFound(_) | Self::ParticipantNotFound { .. } => ErrorKind::NotFound,
            Self::RoomExists(_) | Self::PeerExists { .. } => ErrorKind::AlreadyExists,
            Self::WrongSecret(_) => ErrorKind::WrongSecret,
            Self::NicknameTaken { .. } => ErrorKind::NicknameTaken,
            Self::MediaNotAllowed(_)
            | Self::CreatorOnly(_)
            | Self::NotAMember(_)
            | Self::ForeignPeer(_) => ErrorKind::Unauthorized,
        }
    }
}

impl From<serde_json::Error> for SignalError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidParams(e.to_string())
    }
}

impl From<&SignalError> for RpcError {
    fn from(e: &SignalError) -> Self {
        RpcError::new(e.kind(), e.to_string())
    }
}

/// Transport-level failure; ends the affected connection only.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,

    #[error("transport error: {0}")]
    Transport(String),
}
