//! Request/response contract between the popup and a page.

use std::sync::Arc;

use async_trait::async_trait;
use chatsnap_core::Snapshot;
use chatsnap_page::{PageHost, PageRequest};

use crate::error::TransportError;

/// Addressable page, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    pub id: String,
    pub url: String,
}

/// Delivers popup requests to pages.
///
/// Every call completes exactly once, with a value or an error.
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// The page currently active and focused, if any.
    async fn active_page(&self) -> Result<Option<PageHandle>, TransportError>;

    /// Send a request to `page`; `Ok(None)` means the page has no snapshot yet.
    async fn send(
        &self,
        page: &PageHandle,
        request: PageRequest,
    ) -> Result<Option<Snapshot>, TransportError>;
}

/// Transport talking to a [`PageHost`] in the same process.
#[derive(Clone)]
pub struct InProcessTransport {
    host: Arc<PageHost>,
}

impl InProcessTransport {
    pub fn new(host: Arc<PageHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl PageTransport for InProcessTransport {
    async fn active_page(&self) -> Result<Option<PageHandle>, TransportError> {
        Ok(self.host.active().map(|session| PageHandle {
            id: session.id().to_string(),
            url: session.url().to_string(),
        }))
    }

    async fn send(
        &self,
        page: &PageHandle,
        request: PageRequest,
    ) -> Result<Option<Snapshot>, TransportError> {
        self.host
            .handle(&page.id, request)
            .map(|reply| reply.map(|s| s.as_ref().clone()))
            .map_err(|_| TransportError::ListenerMissing(page.id.clone()))
    }
}
