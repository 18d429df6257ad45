use crate::signaling::Outbox;
use chrono::{DateTime, Utc};
use huddle_core::{MediaKind, ParticipantInfo, PeerId, RoomEvent, ServerFrame};

/// One connection's membership record inside a room.
///
/// The outbox is the participant's exclusive outbound queue. Other
/// participants reach it only through the owning room's guard.
#[derive(Debug)]
pub struct Participant {
    peer_id: PeerId,
    nickname: String,
    is_creator: bool,
    video: bool,
    audio: bool,
    joined_at: DateTime<Utc>,
    outbox: Outbox,
}

impl Participant {
    pub(crate) fn new(
        peer_id: PeerId,
        nickname: String,
        is_creator: bool,
        video: bool,
        audio: bool,
        outbox: Outbox,
    ) -> Self {
        Self {
            peer_id,
            nickname,
            is_creator,
            video,
            audio,
            joined_at: Utc::now(),
            outbox,
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn is_creator(&self) -> bool {
        self.is_creator
    }

    pub fn media(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Video => self.video,
            MediaKind::Audio => self.audio,
        }
    }

    pub(crate) fn set_media(&mut self, kind: MediaKind, enabled: bool) {
        match kind {
            MediaKind::Video => self.video = enabled,
            MediaKind::Audio => self.audio = enabled,
        }
    }

    pub fn info(&self) -> ParticipantInfo {
        ParticipantInfo {
            peer_id: self.peer_id.clone(),
            nickname: self.nickname.clone(),
            video: self.video,
            audio: self.audio,
            is_creator: self.is_creator,
            joined_at: self.joined_at,
        }
    }

    /// Non-blocking enqueue of a notification to this participant.
    pub(crate) fn notify(&self, event: RoomEvent) -> bool {
        self.outbox.push(ServerFrame::Event(event))
    }
}
