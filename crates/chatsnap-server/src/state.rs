//! Shared application state.

use std::sync::Arc;

use chatsnap_core::{ChatsnapConfig, Result};
use chatsnap_page::PageHost;

/// State shared by all route handlers.
pub struct AppState {
    pub config: ChatsnapConfig,
    pub host: Arc<PageHost>,
}

impl AppState {
    pub fn new(config: ChatsnapConfig) -> Result<Self> {
        let host = Arc::new(PageHost::new(&config)?);
        Ok(Self { config, host })
    }
}
