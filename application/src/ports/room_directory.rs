//! Room and message directory port
//!
//! Read-only view of the surrounding platform's rooms: existence checks at
//! creation time and chronological history for context assembly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_domain::{MessageId, RoomId};
use thiserror::Error;

/// Errors from directory lookups
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Directory backend failure: {0}")]
    Backend(String),
}

/// A chronological message in a room
#[derive(Debug, Clone)]
pub struct RoomMessage {
    pub id: MessageId,
    pub author: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Read-only access to rooms and their message history
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// Whether the room exists
    async fn room_exists(&self, room: &RoomId) -> Result<bool, DirectoryError>;

    /// Whether the message exists in the given room
    async fn message_exists(
        &self,
        room: &RoomId,
        message: &MessageId,
    ) -> Result<bool, DirectoryError>;

    /// The most recent messages in the room, oldest first, at most `limit`
    async fn recent_messages(
        &self,
        room: &RoomId,
        limit: usize,
    ) -> Result<Vec<RoomMessage>, DirectoryError>;
}
