//! Semantic retrieval adapters

pub mod lexical;

pub use lexical::LexicalRetriever;
