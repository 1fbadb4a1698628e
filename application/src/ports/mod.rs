//! Ports - interfaces the application layer needs from the outside world
//!
//! Implementations (adapters) live in the infrastructure layer. Tests
//! substitute fakes without touching process state; nothing here is a
//! global registry or singleton.

pub mod agent_directory;
pub mod completion;
pub mod discussion_journal;
pub mod discussion_store;
pub mod room_directory;
pub mod semantic_retrieval;

pub use agent_directory::AgentDirectory;
pub use completion::{CompletionError, CompletionGateway, CompletionRequest};
pub use discussion_journal::{DiscussionJournal, JournalEvent, NoJournal};
pub use discussion_store::{DiscussionStore, StoreError};
pub use room_directory::{DirectoryError, RoomDirectory, RoomMessage};
pub use semantic_retrieval::{RetrievalError, ScoredSnippet, SemanticRetrieval};
