//! Owner of the current page session.
//!
//! Every (re)load closes the previous session and starts a fresh one with an
//! empty store, so a snapshot never outlives the page load that produced it.

use std::sync::Arc;
use std::time::Duration;

use chatsnap_core::{ChatsnapConfig, Error, Result, Snapshot};
use chatsnap_export::ExportBuilder;
use chatsnap_extract::{DomExtractor, IntervalTicker};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::document::LiveDocument;
use crate::protocol::PageRequest;
use crate::session::PageSession;

struct ActivePage {
    session: Arc<PageSession>,
    document: Arc<LiveDocument>,
}

/// Hosts at most one loaded page at a time.
pub struct PageHost {
    extractor: Arc<DomExtractor>,
    exporter: ExportBuilder,
    frame_interval: Duration,
    current: RwLock<Option<ActivePage>>,
}

impl PageHost {
    /// Create a host; fails if the configured selectors do not compile.
    pub fn new(config: &ChatsnapConfig) -> Result<Self> {
        Ok(Self {
            extractor: Arc::new(DomExtractor::new(&config.selectors)?),
            exporter: ExportBuilder::new(config.source.clone()),
            frame_interval: config.frame_interval(),
            current: RwLock::new(None),
        })
    }

    /// Load (or reload) a page and start its extraction pass.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(&self, url: impl Into<String>, html: impl Into<String>) -> Arc<PageSession> {
        let session = Arc::new(PageSession::new(
            url,
            self.extractor.clone(),
            self.exporter.clone(),
        ));
        let document = Arc::new(LiveDocument::new(html));

        let previous = self.current.write().replace(ActivePage {
            session: session.clone(),
            document: document.clone(),
        });
        if let Some(previous) = previous {
            debug!("Closing page session {}", previous.session.id());
            previous.session.close();
        }
        info!("Page loaded: {} (session {})", session.url(), session.id());

        let task_session = session.clone();
        let frame_interval = self.frame_interval;
        tokio::spawn(async move {
            let mut ticker = IntervalTicker::new(frame_interval);
            if let Err(e) = task_session
                .run_extraction(&*document, &mut ticker)
                .await
            {
                debug!("Extraction pass ended early: {}", e);
            }
        });

        session
    }

    /// Replace the active page's markup. Returns false when no page is loaded.
    pub fn update_document(&self, html: impl Into<String>) -> bool {
        match self.current.read().as_ref() {
            Some(active) => {
                active.document.replace(html);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<Arc<PageSession>> {
        self.current.read().as_ref().map(|a| a.session.clone())
    }

    /// Deliver a request addressed to page `page_id`.
    ///
    /// Only the active session listens. A stale id (the page was reloaded or
    /// unloaded since it was looked up) gets `Error::NotFound`.
    pub fn handle(&self, page_id: &str, request: PageRequest) -> Result<Option<Arc<Snapshot>>> {
        match self.active() {
            Some(session) if session.id().to_string() == page_id => {
                let reply = session.respond(request);
                debug!(
                    "{:?} for {}: {}",
                    request,
                    session.url(),
                    if reply.is_some() { "snapshot" } else { "not ready" }
                );
                Ok(reply)
            }
            _ => {
                warn!("Request {:?} for page {} has no listener", request, page_id);
                Err(Error::NotFound(format!("no listener on page {}", page_id)))
            }
        }
    }

    /// Close the active page, if any.
    pub fn unload(&self) {
        if let Some(previous) = self.current.write().take() {
            previous.session.close();
            info!("Page unloaded: {}", previous.session.url());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = r#"<article data-turn="user"><div class="whitespace-pre-wrap">Hello</div></article>"#;

    fn host() -> PageHost {
        PageHost::new(&ChatsnapConfig::default()).unwrap()
    }

    async fn wait_ready(session: &PageSession) {
        for _ in 0..100 {
            if session.store().is_ready() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
        panic!("extraction never completed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_extracts_in_background() {
        let host = host();
        let session = host.load("https://chatgpt.com/c/1", RENDERED);
        wait_ready(&session).await;

        let id = session.id().to_string();
        let snapshot = host.handle(&id, PageRequest::GetChatExport).unwrap().unwrap();
        assert_eq!(snapshot.json.as_ref().unwrap().messages[0].text, "Hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_resets_store() {
        let host = host();
        let first = host.load("https://chatgpt.com/c/1", RENDERED);
        wait_ready(&first).await;

        let second = host.load("https://chatgpt.com/c/1", "<html><body></body></html>");
        assert!(first.is_closed());
        assert_ne!(first.id(), second.id());
        let second_id = second.id().to_string();
        assert!(host.handle(&second_id, PageRequest::GetChatExport).unwrap().is_none());

        assert!(host.update_document(RENDERED));
        wait_ready(&second).await;
        assert!(host.handle(&second_id, PageRequest::GetChatExport).unwrap().is_some());

        // The first page's id no longer reaches a listener.
        let first_id = first.id().to_string();
        assert!(matches!(
            host.handle(&first_id, PageRequest::GetChatExport),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_no_page_loaded() {
        let host = host();
        assert!(host.active().is_none());
        assert!(!host.update_document(RENDERED));
        assert!(matches!(
            host.handle("any", PageRequest::GetChatExport),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unload_closes_session() {
        let host = host();
        let session = host.load("u", "<html></html>");
        host.unload();
        assert!(session.is_closed());
        assert!(host.active().is_none());
    }

    #[test]
    fn test_bad_selectors_rejected() {
        let mut config = ChatsnapConfig::default();
        config.selectors.markdown = "..".into();
        assert!(matches!(PageHost::new(&config), Err(Error::Config(_))));
    }
}
