use crate::error::SignalError;
use crate::room::{Room, RoomConfig, RoomRegistry};
use crate::signaling::{Membership, Session, SessionEvent};
use huddle_core::{
    CreateRoomParams, ErrorKind, JoinRoomParams, LeaveRoomParams, PeerId, RelayParams, RequestId,
    RoomEvent, RoomId, RoomInfoParams, RpcError, RpcRequest, RpcResponse, SendMessageParams,
    ToggleMediaParams, UpdateSettingsParams,
};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What a handler did with its request.
enum Handled {
    /// Reply with this result.
    Result(Value),
    /// The handler already queued its reply.
    Replied,
}

/// Interprets requests against the room model.
///
/// Each request maps to one registry/room operation, its notifications,
/// and at most one reply. Cloning is cheap; one dispatcher serves every
/// connection.
#[derive(Clone, Default)]
pub struct SignalingDispatcher {
    registry: RoomRegistry,
}

impl SignalingDispatcher {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub async fn handle_event(&self, session: &mut Session, event: SessionEvent) {
        match event {
            SessionEvent::Frame(text) => {
                if let Some(response) = self.handle_text(session, &text).await {
                    session.outbox().reply(response);
                }
            }
            SessionEvent::ChannelClosed => {
                debug!("Channel closed for connection {}", session.id());
                self.leave_current(session).await;
            }
        }
    }

    /// Parses one text frame. Frames that are not JSON-RPC requests get an
    /// `InvalidParams` reply, echoing the frame's id when it can be read and
    /// null otherwise.
    pub async fn handle_text(&self, session: &mut Session, text: &str) -> Option<RpcResponse> {
        let value = match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Malformed frame from connection {}: {}", session.id(), e);
                return Some(malformed(None, &e));
            }
        };
        let id = readable_id(&value);

        match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => self.handle_request(session, request).await,
            Err(e) => {
                warn!("Invalid request from connection {}: {}", session.id(), e);
                Some(malformed(id, &e))
            }
        }
    }

    /// Requests without an id are processed but never answered.
    pub async fn handle_request(
        &self,
        session: &mut Session,
        request: RpcRequest,
    ) -> Option<RpcResponse> {
        let RpcRequest {
            id, method, params, ..
        } = request;
        debug!(connection = %session.id(), method = %method, "dispatching request");

        let outcome = self.dispatch(session, id.as_ref(), &method, params).await;
        match (id, outcome) {
            (_, Ok(Handled::Replied)) => None,
            (None, Ok(Handled::Result(_))) => None,
            (None, Err(e)) => {
                debug!("{} without id failed: {}", method, e);
                None
            }
            (id, Ok(Handled::Result(result))) => Some(RpcResponse::success(id, result)),
            (id, Err(e)) => {
                debug!("{} failed for connection {}: {}", method, session.id(), e);
                Some(RpcResponse::failure(id, RpcError::from(&e)))
            }
        }
    }

    async fn dispatch(
        &self,
        session: &mut Session,
        id: Option<&RequestId>,
        method: &str,
        params: Value,
    ) -> Result<Handled, SignalError> {
        match method {
            "createRoom" => self.create_room(parse(params)?).await,
            "joinRoom" => self.join_room(session, id, parse(params)?).await,
            "sendMessage" => self.send_message(session, parse(params)?).await,
            "updateSettings" => self.update_settings(session, parse(params)?).await,
            "toggleMedia" => self.toggle_media(session, parse(params)?).await,
            "leaveRoom" => self.leave_room(session, parse(params)?).await,
            "relay" | "signal" => self.relay(session, parse(params)?).await,
            "listRooms" => Ok(Handled::Result(to_result(self.registry.summaries().await))),
            "roomInfo" => self.room_info(parse(params)?).await,
            other => Err(SignalError::MethodNotFound(other.to_string())),
        }
    }

    async fn create_room(&self, params: CreateRoomParams) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        require("nickname", &params.nickname)?;

        let room = self.registry.create_room(RoomConfig::from(params))?;
        let settings = room.lock().await.settings();
        Ok(Handled::Result(to_result(settings)))
    }

    async fn join_room(
        &self,
        session: &mut Session,
        id: Option<&RequestId>,
        params: JoinRoomParams,
    ) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        require("nickname", &params.nickname)?;
        require_peer_id(&params.peer_id)?;
        if let Some(current) = session.membership() {
            return Err(SignalError::InvalidParams(format!(
                "connection already joined room {}",
                current.room.id()
            )));
        }

        let room = self.registry.lookup_room(&params.room_id)?;
        let mut guard = room.lock().await;
        let joined = guard.join(
            params.peer_id,
            params.nickname,
            params.video,
            params.audio,
            &params.secret,
            session.outbox().clone(),
        )?;

        let snapshot = guard
            .snapshot(&joined.peer_id)
            .ok_or_else(|| SignalError::ParticipantNotFound {
                room_id: room.id().clone(),
                peer_id: joined.peer_id.clone(),
            })?;
        guard.broadcast(
            &RoomEvent::ParticipantJoined(joined.clone()),
            Some(&joined.peer_id),
        );
        // Queued under the lock so the snapshot precedes any later room event.
        if id.is_some() {
            session
                .outbox()
                .reply(RpcResponse::success(id.cloned(), to_result(snapshot)));
        }
        drop(guard);

        info!(
            "{} ({}) joined room {} on connection {}",
            joined.nickname,
            joined.peer_id,
            room.id(),
            session.id()
        );
        session.activate(Membership {
            room: room.clone(),
            peer_id: joined.peer_id,
            nickname: joined.nickname,
        });
        Ok(Handled::Replied)
    }

    async fn send_message(
        &self,
        session: &mut Session,
        params: SendMessageParams,
    ) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        let room = self.registry.lookup_room(&params.room_id)?;

        let mut guard = room.lock().await;
        if let Some(peer_id) = &params.peer_id {
            guard.require_participant(peer_id)?;
        }
        let member = member_of(session, &room)?;
        if let Some(peer_id) = &params.peer_id {
            if peer_id != &member.peer_id {
                return Err(SignalError::ForeignPeer(peer_id.clone()));
            }
        }

        let entry = guard.append_chat(&member.nickname, params.text);
        guard.broadcast(&RoomEvent::ChatMessage(entry.clone()), None);
        Ok(Handled::Result(to_result(entry)))
    }

    async fn update_settings(
        &self,
        session: &mut Session,
        params: UpdateSettingsParams,
    ) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        let room = self.registry.lookup_room(&params.room_id)?;
        let member = member_of(session, &room)?;

        let mut guard = room.lock().await;
        let changed =
            guard.set_permissions(&member.nickname, params.allow_video, params.allow_audio)?;
        guard.broadcast(&RoomEvent::SettingsChanged(changed), Some(&member.peer_id));
        info!(
            "Room {} settings updated by {}: video={} audio={}",
            room.id(),
            member.nickname,
            params.allow_video,
            params.allow_audio
        );
        Ok(Handled::Result(to_result(guard.settings())))
    }

    async fn toggle_media(
        &self,
        session: &mut Session,
        params: ToggleMediaParams,
    ) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        let room = self.registry.lookup_room(&params.room_id)?;

        let mut guard = room.lock().await;
        guard.require_participant(&params.peer_id)?;
        let member = member_of(session, &room)?;
        if member.peer_id != params.peer_id {
            return Err(SignalError::ForeignPeer(params.peer_id));
        }

        let state = guard.toggle_media(&params.peer_id, params.kind, params.enabled)?;
        guard.broadcast(&RoomEvent::MediaChanged(state.clone()), Some(&member.peer_id));
        Ok(Handled::Result(to_result(state)))
    }

    async fn leave_room(
        &self,
        session: &mut Session,
        params: LeaveRoomParams,
    ) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        let room = self.registry.lookup_room(&params.room_id)?;
        room.lock().await.require_participant(&params.peer_id)?;
        let member = member_of(session, &room)?;
        if member.peer_id != params.peer_id {
            return Err(SignalError::ForeignPeer(params.peer_id));
        }

        self.leave_current(session).await;
        Ok(Handled::Result(json!({ "left": true })))
    }

    async fn relay(
        &self,
        session: &mut Session,
        params: RelayParams,
    ) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        require_peer_id(&params.to)?;
        let room = self.registry.lookup_room(&params.room_id)?;

        let guard = room.lock().await;
        guard.require_participant(&params.from)?;
        let member = member_of(session, &room)?;
        if member.peer_id != params.from {
            return Err(SignalError::ForeignPeer(params.from));
        }

        let target = params.to.clone();
        guard.send_to(&target, RoomEvent::Relay(params))?;
        debug!("Relayed payload {} -> {} in room {}", member.peer_id, target, room.id());
        Ok(Handled::Result(json!({ "delivered": true })))
    }

    async fn room_info(&self, params: RoomInfoParams) -> Result<Handled, SignalError> {
        require_room_id(&params.room_id)?;
        let room = self.registry.lookup_room(&params.room_id)?;
        let info = room.lock().await.info();
        Ok(Handled::Result(to_result(info)))
    }

    /// Removes the session's participant, tells the rest of the room, and
    /// drops the room from the registry once it is empty. Shared by
    /// `leaveRoom` and channel closure.
    pub async fn leave_current(&self, session: &mut Session) {
        let Some(member) = session.take_membership() else {
            return;
        };

        let departure = {
            let mut guard = member.room.lock().await;
            let departure = guard.leave(&member.peer_id);
            if let Some(d) = &departure {
                guard.broadcast(&RoomEvent::ParticipantLeft(d.participant.clone()), None);
            }
            departure
        };

        let Some(departure) = departure else {
            warn!(
                "Peer {} was already gone from room {}",
                member.peer_id,
                member.room.id()
            );
            return;
        };

        info!(
            "{} ({}) left room {}",
            member.nickname,
            member.peer_id,
            member.room.id()
        );
        if departure.room_empty {
            self.registry.remove_room(&member.room);
        }
    }
}

/// The session's membership, if it is in exactly this room instance.
fn member_of(session: &Session, room: &Arc<Room>) -> Result<Membership, SignalError> {
    match session.membership() {
        Some(m) if Arc::ptr_eq(&m.room, room) => Ok(m.clone()),
        _ => Err(SignalError::NotAMember(room.id().clone())),
    }
}

fn malformed(id: Option<RequestId>, e: &serde_json::Error) -> RpcResponse {
    RpcResponse::failure(
        id,
        RpcError::new(ErrorKind::InvalidParams, format!("malformed request: {e}")),
    )
}

/// The `id` of a frame that failed request decoding, if it is a valid id.
fn readable_id(frame: &Value) -> Option<RequestId> {
    frame
        .get("id")
        .and_then(|id| RequestId::deserialize(id).ok())
}

fn parse<T: DeserializeOwned>(params: Value) -> Result<T, SignalError> {
    Ok(serde_json::from_value(params)?)
}

fn to_result<T: Serialize>(value: T) -> Value {
    match serde_json::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to serialize reply: {}", e);
            Value::Null
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), SignalError> {
    if value.is_empty() {
        return Err(SignalError::InvalidParams(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_room_id(id: &RoomId) -> Result<(), SignalError> {
    require("roomId", id.as_str())
}

fn require_peer_id(id: &PeerId) -> Result<(), SignalError> {
    require("peerId", id.as_str())
}
