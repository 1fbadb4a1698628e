//! Context subdomain - bounded prompt grounding for a turn

pub mod bundle;

pub use bundle::{ContextBundle, ContextLimits, ContextSnippet, SnippetKind};
