use crate::model::chat::ChatEntry;
use crate::model::peer::PeerId;
use crate::model::room::{MediaKind, RoomId, RoomSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Request parameters (client -> server) ---

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomParams {
    pub room_id: RoomId,
    #[serde(default, alias = "password")]
    pub secret: String,
    #[serde(alias = "creatorNickname")]
    pub nickname: String,
    #[serde(default)]
    pub full_control: bool,
    #[serde(default)]
    pub allow_video: bool,
    #[serde(default)]
    pub allow_audio: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomParams {
    pub room_id: RoomId,
    #[serde(default, alias = "password")]
    pub secret: String,
    pub nickname: String,
    pub peer_id: PeerId,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub audio: bool,
}

/// `peer_id` and `nickname` are accepted for compatibility; the server
/// attributes chat to the sending connection's participant.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    pub room_id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(alias = "message")]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsParams {
    pub room_id: RoomId,
    pub allow_video: bool,
    pub allow_audio: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ToggleMediaParams {
    pub room_id: RoomId,
    pub peer_id: PeerId,
    #[serde(alias = "type")]
    pub kind: MediaKind,
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomParams {
    pub room_id: RoomId,
    pub peer_id: PeerId,
}

/// Opaque negotiation payload addressed by room and target peer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelayParams {
    pub room_id: RoomId,
    pub from: PeerId,
    pub to: PeerId,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub payload: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoParams {
    pub room_id: RoomId,
}

// --- Views returned in replies and notifications ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub peer_id: PeerId,
    pub nickname: String,
    pub video: bool,
    pub audio: bool,
    pub is_creator: bool,
    pub joined_at: DateTime<Utc>,
}

/// Reply to a successful join, taken at a single point in time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub settings: RoomSettings,
    #[serde(rename = "self")]
    pub own: ParticipantInfo,
    pub participants: Vec<ParticipantInfo>,
    pub chat_history: Vec<ChatEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub settings: RoomSettings,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: RoomId,
    pub has_secret: bool,
    pub participants: usize,
    pub creator: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    pub peer_id: PeerId,
    pub kind: MediaKind,
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantLeft {
    pub peer_id: PeerId,
    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChanged {
    pub room_id: RoomId,
    pub allow_video: bool,
    pub allow_audio: bool,
}

// --- Notifications (server -> client) ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum RoomEvent {
    ParticipantJoined(ParticipantInfo),
    ParticipantLeft(ParticipantLeft),
    ChatMessage(ChatEntry),
    SettingsChanged(SettingsChanged),
    MediaChanged(MediaState),
    Relay(RelayParams),
}

impl RoomEvent {
    pub fn method(&self) -> &'static str {
        match self {
            Self::ParticipantJoined(_) => "participantJoined",
            Self::ParticipantLeft(_) => "participantLeft",
            Self::ChatMessage(_) => "chatMessage",
            Self::SettingsChanged(_) => "settingsChanged",
            Self::MediaChanged(_) => "mediaChanged",
            Self::Relay(_) => "relay",
        }
    }
}
