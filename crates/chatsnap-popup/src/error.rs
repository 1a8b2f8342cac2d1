//! Popup error types.

use thiserror::Error;

pub const NO_ACTIVE_PAGE: &str = "No active tab found.";
pub const UNREACHABLE: &str = "Cannot reach the page. Open a ChatGPT conversation and refresh.";
pub const NOT_CAPTURED: &str = "No conversation captured yet.";

/// Why a snapshot could not be fetched. `Display` is the user-facing text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    #[error("{}", NO_ACTIVE_PAGE)]
    NoActivePage,

    #[error("{}", UNREACHABLE)]
    Unreachable,

    #[error("{}", NOT_CAPTURED)]
    NotCaptured,
}

/// Failure delivering a request to a page.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("No listener on page {0}")]
    ListenerMissing(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}
