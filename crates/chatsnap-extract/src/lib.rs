//! Conversation extraction from a rendered chat page.
//!
//! The pipeline is leaf-first: [`normalize`] cleans raw strings, [`dedup`]
//! drops repeated paragraph blocks, [`dom`] walks turn elements into a
//! [`Conversation`](chatsnap_core::Conversation), and [`wait`] suspends
//! until the page has rendered its first turn.

pub mod dedup;
pub mod dom;
pub mod normalize;
pub mod wait;

pub use dedup::dedupe_text_blocks;
pub use dom::DomExtractor;
pub use normalize::normalize_text;
pub use wait::{wait_until_ready, FrameTicker, IntervalTicker, WaitError};
