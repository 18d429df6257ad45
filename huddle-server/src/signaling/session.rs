use crate::room::Room;
use crate::signaling::Outbox;
use huddle_core::PeerId;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The room membership a connection currently holds.
#[derive(Debug, Clone)]
pub struct Membership {
    pub room: Arc<Room>,
    pub peer_id: PeerId,
    pub nickname: String,
}

/// Lifecycle of the participant bound to a connection.
///
/// `Joining` is never observable from outside: the join check and the
/// insert happen under one room lock.
#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Idle,
    Active(Membership),
    Left,
}

/// Events a connection feeds into the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Frame(String),
    ChannelClosed,
}

/// Per-connection dispatcher state.
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,
    outbox: Outbox,
    state: SessionState,
}

impl Session {
    pub fn new(outbox: Outbox) -> Self {
        Self {
            id: outbox.connection(),
            outbox,
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn membership(&self) -> Option<&Membership> {
        match &self.state {
            SessionState::Active(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn activate(&mut self, membership: Membership) {
        self.state = SessionState::Active(membership);
    }

    pub(crate) fn take_membership(&mut self) -> Option<Membership> {
        match std::mem::take(&mut self.state) {
            SessionState::Active(m) => {
                self.state = SessionState::Left;
                Some(m)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}
