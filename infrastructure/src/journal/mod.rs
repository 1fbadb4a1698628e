//! Discussion journal adapters

pub mod jsonl;

pub use jsonl::JsonlDiscussionJournal;
