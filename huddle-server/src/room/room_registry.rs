use crate::error::SignalError;
use crate::room::{Room, RoomConfig};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use huddle_core::{RoomId, RoomSummary};
use std::sync::Arc;
use tracing::info;

/// Process-wide map from room id to room.
///
/// Every operation is a single map insert, lookup or delete; no room lock
/// is ever taken while a map shard is held.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, Arc<Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new empty room. A closed room still waiting for removal
    /// under the same id is replaced.
    pub fn create_room(&self, config: RoomConfig) -> Result<Arc<Room>, SignalError> {
        match self.rooms.entry(config.id.clone()) {
            Entry::Occupied(mut entry) if entry.get().is_closed() => {
                let room = Arc::new(Room::new(config));
                entry.insert(room.clone());
                info!("Created room {} (replacing closed instance)", room.id());
                Ok(room)
            }
            Entry::Occupied(_) => Err(SignalError::RoomExists(config.id)),
            Entry::Vacant(entry) => {
                let room = Arc::new(Room::new(config));
                entry.insert(room.clone());
                info!("Created room {}", room.id());
                Ok(room)
            }
        }
    }

    pub fn lookup_room(&self, id: &RoomId) -> Result<Arc<Room>, SignalError> {
        self.rooms
            .get(id)
            .map(|entry| entry.value().clone())
            .filter(|room| !room.is_closed())
            .ok_or_else(|| SignalError::RoomNotFound(id.clone()))
    }

    /// Removes exactly this room instance, leaving a re-created room with
    /// the same id untouched. Idempotent.
    pub fn remove_room(&self, room: &Arc<Room>) -> bool {
        let removed = self
            .rooms
            .remove_if(room.id(), |_, current| Arc::ptr_eq(current, room))
            .is_some();
        if removed {
            info!("Removed empty room {}", room.id());
        }
        removed
    }

    pub fn room_count(&self) -> usize {
        self.rooms.iter().filter(|entry| !entry.value().is_closed()).count()
    }

    fn open_rooms(&self) -> Vec<Arc<Room>> {
        self.rooms
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|room| !room.is_closed())
            .collect()
    }

    /// Summaries sorted by room id. Each room is read under its own lock
    /// after the map has been released.
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        let mut summaries = Vec::new();
        for room in self.open_rooms() {
            let guard = room.lock().await;
            summaries.push(RoomSummary {
                id: room.id().clone(),
                has_secret: room.has_secret(),
                participants: guard.participant_count(),
                creator: room.creator().to_string(),
            });
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    pub async fn participant_total(&self) -> usize {
        let mut total = 0;
        for room in self.open_rooms() {
            total += room.lock().await.participant_count();
        }
        total
    }
}
