//! Infrastructure layer for colloquy
//!
//! Adapters implementing the application layer's ports: the in-memory
//! execution ledger, room/agent directories, lexical retrieval, local
//! completion gateways, the JSONL journal, and the TOML config loader.

pub mod config;
pub mod directory;
pub mod generation;
pub mod journal;
pub mod retrieval;
pub mod store;

pub use config::{ConfigLoader, FileConfig};
pub use directory::{InMemoryAgentDirectory, InMemoryRoomDirectory};
pub use generation::{PersonaStubGateway, ScriptedCompletionGateway};
pub use journal::JsonlDiscussionJournal;
pub use retrieval::LexicalRetriever;
pub use store::InMemoryDiscussionStore;
