//! Transport over the page host's HTTP bridge.

use async_trait::async_trait;
use chatsnap_core::Snapshot;
use chatsnap_page::{PageInfo, PageRequest};
use reqwest::StatusCode;
use tracing::warn;

use crate::error::TransportError;
use crate::transport::{PageHandle, PageTransport};

/// Talks to a running `chatsnap serve` instance.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn active_page(&self) -> Result<Option<PageHandle>, TransportError> {
        let url = format!("{}/api/pages/active", self.base_url);
        let resp = self.client.get(&url).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let info: PageInfo = resp
                    .json()
                    .await
                    .map_err(|e| TransportError::Protocol(e.to_string()))?;
                Ok(Some(PageHandle {
                    id: info.id,
                    url: info.url,
                }))
            }
            status => Err(TransportError::Http(format!("{} from {}", status, url))),
        }
    }

    async fn send(
        &self,
        page: &PageHandle,
        request: PageRequest,
    ) -> Result<Option<Snapshot>, TransportError> {
        let url = format!("{}/api/pages/{}/messages", self.base_url, page.id);
        let resp = self.client.post(&url).json(&request).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            warn!("Page {} did not accept {:?}: {}", page.id, request, status);
            return Err(TransportError::ListenerMissing(page.id.clone()));
        }
        if !status.is_success() {
            return Err(TransportError::Http(format!("{} from {}", status, url)));
        }

        resp.json::<Option<Snapshot>>()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))
    }
}
