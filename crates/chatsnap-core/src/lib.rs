//! Chatsnap Core — conversation data model, configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ChatsnapConfig, DomSelectors};
pub use error::{Error, Result};
pub use types::*;
