//! Export builders.
//!
//! [`ExportBuilder`] wraps a conversation in the JSON metadata envelope;
//! [`build_context_transcript`] renders the same conversation as plain text
//! framed for reuse as model context.

pub mod builder;
pub mod readme;
pub mod transcript;

pub use builder::ExportBuilder;
pub use readme::readme;
pub use transcript::build_context_transcript;
