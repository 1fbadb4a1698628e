//! Room and agent directory adapters

pub mod memory;

pub use memory::{InMemoryAgentDirectory, InMemoryRoomDirectory};
