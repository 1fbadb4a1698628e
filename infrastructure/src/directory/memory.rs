//! In-memory room and agent directories.
//!
//! Seeded at construction; the orchestrator only reads. These back the demo
//! binary and tests; a real deployment would adapt the platform's room and
//! agent services instead.

use async_trait::async_trait;
use chrono::Utc;
use colloquy_application::ports::agent_directory::AgentDirectory;
use colloquy_application::ports::room_directory::{DirectoryError, RoomDirectory, RoomMessage};
use colloquy_domain::{AgentId, AgentProfile, MessageId, RoomId};
use std::collections::HashMap;
use std::sync::Mutex;

/// A room with its chronological messages
struct RoomRecord {
    messages: Vec<RoomMessage>,
}

/// Room directory seeded with rooms and messages
#[derive(Default)]
pub struct InMemoryRoomDirectory {
    rooms: Mutex<HashMap<RoomId, RoomRecord>>,
}

impl InMemoryRoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty room
    pub fn add_room(&self, room: impl Into<RoomId>) {
        self.rooms
            .lock()
            .unwrap()
            .entry(room.into())
            .or_insert(RoomRecord {
                messages: Vec::new(),
            });
    }

    /// Append a message to a room, creating the room if needed
    pub fn add_message(
        &self,
        room: impl Into<RoomId>,
        message: impl Into<MessageId>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) {
        let mut rooms = self.rooms.lock().unwrap();
        let record = rooms.entry(room.into()).or_insert(RoomRecord {
            messages: Vec::new(),
        });
        record.messages.push(RoomMessage {
            id: message.into(),
            author: author.into(),
            content: content.into(),
            sent_at: Utc::now(),
        });
    }
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn room_exists(&self, room: &RoomId) -> Result<bool, DirectoryError> {
        Ok(self.rooms.lock().unwrap().contains_key(room))
    }

    async fn message_exists(
        &self,
        room: &RoomId,
        message: &MessageId,
    ) -> Result<bool, DirectoryError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms
            .get(room)
            .is_some_and(|record| record.messages.iter().any(|m| &m.id == message)))
    }

    async fn recent_messages(
        &self,
        room: &RoomId,
        limit: usize,
    ) -> Result<Vec<RoomMessage>, DirectoryError> {
        let rooms = self.rooms.lock().unwrap();
        let record = rooms
            .get(room)
            .ok_or_else(|| DirectoryError::RoomNotFound(room.clone()))?;
        let skip = record.messages.len().saturating_sub(limit);
        Ok(record.messages[skip..].to_vec())
    }
}

/// Agent directory seeded with authored profiles
#[derive(Default)]
pub struct InMemoryAgentDirectory {
    profiles: Mutex<HashMap<AgentId, AgentProfile>>,
}

impl InMemoryAgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, profile: AgentProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id().clone(), profile);
    }
}

#[async_trait]
impl AgentDirectory for InMemoryAgentDirectory {
    async fn find_agent(&self, id: &AgentId) -> Result<Option<AgentProfile>, DirectoryError> {
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }
}
