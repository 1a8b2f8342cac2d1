//! Chatsnap page host — HTTP bridge between popup clients and the loaded page.

pub mod commands;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
