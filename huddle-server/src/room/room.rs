use crate::error::SignalError;
use crate::room::participant::Participant;
use crate::signaling::Outbox;
use huddle_core::{
    ChatEntry, CreateRoomParams, MediaKind, MediaState, ParticipantInfo, ParticipantLeft, PeerId,
    RoomEvent, RoomId, RoomInfo, RoomSettings, RoomSnapshot, SettingsChanged,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Creation-time settings of a room.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub id: RoomId,
    pub secret: String,
    pub creator: String,
    pub full_control: bool,
    pub allow_video: bool,
    pub allow_audio: bool,
}

impl From<CreateRoomParams> for RoomConfig {
    fn from(p: CreateRoomParams) -> Self {
        Self {
            id: p.room_id,
            secret: p.secret,
            creator: p.nickname,
            full_control: p.full_control,
            allow_video: p.allow_video,
            allow_audio: p.allow_audio,
        }
    }
}

/// A named group of participants with its own mutation lock.
///
/// Immutable settings live outside the lock. Everything that changes
/// (permissions, membership, chat) sits in [`RoomState`] and is only
/// reachable through a [`RoomGuard`].
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    secret: String,
    creator: String,
    full_control: bool,
    closed: AtomicBool,
    state: Mutex<RoomState>,
}

#[derive(Debug)]
struct RoomState {
    allow_video: bool,
    allow_audio: bool,
    participants: HashMap<PeerId, Participant>,
    chat_log: Vec<ChatEntry>,
}

/// Outcome of removing a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub participant: ParticipantLeft,
    /// The room became empty and is now closed.
    pub room_empty: bool,
}

impl Room {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            id: config.id,
            secret: config.secret,
            creator: config.creator,
            full_control: config.full_control,
            closed: AtomicBool::new(false),
            state: Mutex::new(RoomState {
                allow_video: config.allow_video,
                allow_audio: config.allow_audio,
                participants: HashMap::new(),
                chat_log: Vec::new(),
            }),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// A closed room lost its last participant and accepts no further joins.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn lock(&self) -> RoomGuard<'_> {
        RoomGuard {
            room: self,
            state: self.state.lock().await,
        }
    }
}

/// Exclusive access to a room's mutable state.
///
/// Mutations and the broadcasts announcing them happen under the same
/// guard, so every participant observes room changes in one order.
pub struct RoomGuard<'a> {
    room: &'a Room,
    state: MutexGuard<'a, RoomState>,
}

impl RoomGuard<'_> {
    pub fn join(
        &mut self,
        peer_id: PeerId,
        nickname: String,
        video: bool,
        audio: bool,
        secret: &str,
        outbox: Outbox,
    ) -> Result<ParticipantInfo, SignalError> {
        let room = self.room;
        if room.is_closed() {
            return Err(SignalError::RoomNotFound(room.id.clone()));
        }
        if !room.secret.is_empty() && room.secret != secret {
            return Err(SignalError::WrongSecret(room.id.clone()));
        }
        if self.state.participants.values().any(|p| p.nickname() == nickname) {
            return Err(SignalError::NicknameTaken {
                room_id: room.id.clone(),
                nickname,
            });
        }
        if self.state.participants.contains_key(&peer_id) {
            return Err(SignalError::PeerExists {
                room_id: room.id.clone(),
                peer_id,
            });
        }

        let is_creator = nickname == room.creator;
        let video = video && self.may_publish(MediaKind::Video, is_creator);
        let audio = audio && self.may_publish(MediaKind::Audio, is_creator);

        let participant = Participant::new(peer_id.clone(), nickname, is_creator, video, audio, outbox);
        let info = participant.info();
        self.state.participants.insert(peer_id, participant);

        debug!(room = %room.id, peer = %info.peer_id, "participant inserted");
        Ok(info)
    }

    /// Removes the participant if present. Marks the room closed when it
    /// becomes empty so that no join can slip in before registry removal.
    pub fn leave(&mut self, peer_id: &PeerId) -> Option<Departure> {
        let participant = self.state.participants.remove(peer_id)?;
        let room_empty = self.state.participants.is_empty();
        if room_empty {
            self.room.closed.store(true, Ordering::Release);
        }

        Some(Departure {
            participant: ParticipantLeft {
                peer_id: participant.peer_id().clone(),
                nickname: participant.nickname().to_string(),
            },
            room_empty,
        })
    }

    pub fn set_permissions(
        &mut self,
        requester_nickname: &str,
        allow_video: bool,
        allow_audio: bool,
    ) -> Result<SettingsChanged, SignalError> {
        if requester_nickname != self.room.creator {
            return Err(SignalError::CreatorOnly("update room settings"));
        }

        self.state.allow_video = allow_video;
        self.state.allow_audio = allow_audio;

        Ok(SettingsChanged {
            room_id: self.room.id.clone(),
            allow_video,
            allow_audio,
        })
    }

    pub fn toggle_media(
        &mut self,
        peer_id: &PeerId,
        kind: MediaKind,
        enabled: bool,
    ) -> Result<MediaState, SignalError> {
        let is_creator = self.require_participant(peer_id)?.is_creator();

        if enabled && !self.may_publish(kind, is_creator) {
            return Err(SignalError::MediaNotAllowed(kind));
        }

        if let Some(p) = self.state.participants.get_mut(peer_id) {
            p.set_media(kind, enabled);
        }

        Ok(MediaState {
            peer_id: peer_id.clone(),
            kind,
            enabled,
        })
    }

    pub fn append_chat(&mut self, nickname: &str, text: String) -> ChatEntry {
        let entry = ChatEntry::now(nickname, text);
        self.state.chat_log.push(entry.clone());
        entry
    }

    pub fn participant(&self, peer_id: &PeerId) -> Option<&Participant> {
        self.state.participants.get(peer_id)
    }

    /// `NotFound` unless `peer_id` is currently in the room.
    pub fn require_participant(&self, peer_id: &PeerId) -> Result<&Participant, SignalError> {
        self.state
            .participants
            .get(peer_id)
            .ok_or_else(|| SignalError::ParticipantNotFound {
                room_id: self.room.id.clone(),
                peer_id: peer_id.clone(),
            })
    }

    pub fn participant_count(&self) -> usize {
        self.state.participants.len()
    }

    pub fn settings(&self) -> RoomSettings {
        RoomSettings {
            room_id: self.room.id.clone(),
            creator: self.room.creator.clone(),
            has_secret: self.room.has_secret(),
            full_control: self.room.full_control,
            allow_video: self.state.allow_video,
            allow_audio: self.state.allow_audio,
        }
    }

    /// View handed to a newly joined participant. `None` if `own` is absent.
    pub fn snapshot(&self, own: &PeerId) -> Option<RoomSnapshot> {
        let own_info = self.state.participants.get(own)?.info();
        Some(RoomSnapshot {
            settings: self.settings(),
            own: own_info,
            participants: self.participants_except(Some(own)),
            chat_history: self.state.chat_log.clone(),
        })
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            settings: self.settings(),
            participants: self.participants_except(None),
        }
    }

    /// Enqueues `event` to every participant except `except`. Returns how
    /// many queues accepted it.
    pub fn broadcast(&self, event: &RoomEvent, except: Option<&PeerId>) -> usize {
        let mut delivered = 0;
        for p in self.state.participants.values() {
            if Some(p.peer_id()) == except {
                continue;
            }
            if p.notify(event.clone()) {
                delivered += 1;
            }
        }
        debug!(
            room = %self.room.id,
            method = event.method(),
            delivered,
            "broadcast room event"
        );
        delivered
    }

    pub fn send_to(&self, peer_id: &PeerId, event: RoomEvent) -> Result<(), SignalError> {
        self.require_participant(peer_id)?.notify(event);
        Ok(())
    }

    fn may_publish(&self, kind: MediaKind, is_creator: bool) -> bool {
        let allowed = match kind {
            MediaKind::Video => self.state.allow_video,
            MediaKind::Audio => self.state.allow_audio,
        };
        is_creator || self.room.full_control || allowed
    }

    fn participants_except(&self, except: Option<&PeerId>) -> Vec<ParticipantInfo> {
        let mut list: Vec<ParticipantInfo> = self
            .state
            .participants
            .values()
            .filter(|p| Some(p.peer_id()) != except)
            .map(Participant::info)
            .collect();
        list.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.peer_id.cmp(&b.peer_id)));
        list
    }
}
