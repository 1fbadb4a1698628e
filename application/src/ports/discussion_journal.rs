//! Port for structured discussion journaling.
//!
//! Defines the [`DiscussionJournal`] trait for recording lifecycle events
//! (creation, state changes, recorded turns, failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! discussion's audit trail in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured journal event.
///
/// Each event has a type string and a JSON payload with event-specific
/// fields; adapters stamp the timestamp at write time.
pub struct JournalEvent {
    /// Event type identifier (e.g., "discussion_created", "turn_recorded").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl JournalEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording discussion lifecycle events.
///
/// Implementations write each event as a single record (e.g., one JSONL
/// line). `record` is intentionally synchronous and non-fallible so a
/// journaling failure can never disrupt the turn loop.
pub trait DiscussionJournal: Send + Sync {
    fn record(&self, event: JournalEvent);
}

/// No-op implementation for tests and when journaling is disabled.
pub struct NoJournal;

impl DiscussionJournal for NoJournal {
    fn record(&self, _event: JournalEvent) {}
}
