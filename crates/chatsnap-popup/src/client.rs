//! Popup client: fetch, render, copy, save.

use chatsnap_core::{Result, Snapshot};
use chatsnap_page::PageRequest;
use tracing::{info, warn};

use crate::error::{FetchError, NOT_CAPTURED};
use crate::sinks::{Clipboard, DownloadFile, DownloadSink};
use crate::transport::PageTransport;

pub const LOADING: &str = "Loading…";
pub const TRANSCRIPT_UNAVAILABLE: &str = "Transcript not available on this page.";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// What the popup currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupView {
    pub output: String,
    pub copy_enabled: bool,
    pub save_enabled: bool,
}

/// One popup session.
pub struct PopupClient<T: PageTransport> {
    transport: T,
    export_file_name: String,
    latest: Option<Snapshot>,
    view: PopupView,
}

impl<T: PageTransport> PopupClient<T> {
    pub fn new(transport: T, export_file_name: impl Into<String>) -> Self {
        Self {
            transport,
            export_file_name: export_file_name.into(),
            latest: None,
            view: PopupView::default(),
        }
    }

    pub fn view(&self) -> &PopupView {
        &self.view
    }

    /// Ask the active page for its snapshot.
    ///
    /// Clears any previously fetched snapshot first.
    pub async fn fetch(&mut self) -> std::result::Result<Snapshot, FetchError> {
        self.latest = None;

        let page = match self.transport.active_page().await {
            Ok(Some(page)) => page,
            Ok(None) => return Err(FetchError::NoActivePage),
            Err(e) => {
                warn!("Active page lookup failed: {}", e);
                return Err(FetchError::Unreachable);
            }
        };

        match self.transport.send(&page, PageRequest::GetChatExport).await {
            Ok(Some(snapshot)) => {
                self.latest = Some(snapshot.clone());
                Ok(snapshot)
            }
            Ok(None) => Err(FetchError::NotCaptured),
            Err(e) => {
                warn!("Request to {} failed: {}", page.url, e);
                Err(FetchError::Unreachable)
            }
        }
    }

    /// Fetch and update the view.
    pub async fn refresh(&mut self) {
        self.view = PopupView {
            output: LOADING.into(),
            copy_enabled: false,
            save_enabled: false,
        };

        match self.fetch().await {
            Err(e) => {
                self.view.output = e.to_string();
            }
            Ok(snapshot) => {
                self.view.copy_enabled = snapshot.has_transcript();
                self.view.save_enabled = snapshot.has_json();
                self.view.output = match snapshot.transcript {
                    Some(t) if !t.is_empty() => t,
                    _ => TRANSCRIPT_UNAVAILABLE.into(),
                };
            }
        }
    }

    /// Copy the transcript, fetching first if nothing was fetched yet.
    ///
    /// Returns whether a transcript (rather than the fallback text) was copied.
    pub async fn copy(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool> {
        if self.latest.is_none() {
            self.refresh().await;
        }

        match self.latest.as_ref().and_then(|s| s.transcript.as_deref()) {
            Some(transcript) if !transcript.is_empty() => {
                clipboard.write_text(transcript).await?;
                info!("Transcript copied");
                Ok(true)
            }
            _ => {
                clipboard.write_text(NOT_CAPTURED).await?;
                Ok(false)
            }
        }
    }

    /// Save the JSON export, fetching first if nothing was fetched yet.
    ///
    /// Returns whether a file was produced.
    pub async fn save(&mut self, downloads: &mut dyn DownloadSink) -> Result<bool> {
        if self.latest.is_none() {
            self.refresh().await;
        }

        let Some(json) = self.latest.as_ref().and_then(|s| s.json.as_ref()) else {
            self.view.output = NOT_CAPTURED.into();
            return Ok(false);
        };

        let body = serde_json::to_string_pretty(json)?;
        downloads
            .save(DownloadFile {
                name: self.export_file_name.clone(),
                content_type: JSON_CONTENT_TYPE.into(),
                body,
            })
            .await?;
        Ok(true)
    }
}
