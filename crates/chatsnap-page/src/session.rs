//! One page load: extraction pass, stored snapshot, request handling.

use std::sync::Arc;

use chatsnap_core::{Conversation, Error, Result, Snapshot};
use chatsnap_export::{build_context_transcript, ExportBuilder};
use chatsnap_extract::{
    dedupe_text_blocks, wait_until_ready, DomExtractor, FrameTicker, WaitError,
};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::document::DocumentSource;
use crate::protocol::{PageInfo, PageRequest};
use crate::store::SnapshotStore;

const PREVIEW_CHARS: usize = 200;

/// State owned by a single page load.
pub struct PageSession {
    id: Uuid,
    url: String,
    loaded_at: DateTime<Utc>,
    store: SnapshotStore,
    extractor: Arc<DomExtractor>,
    exporter: ExportBuilder,
    cancel: CancellationToken,
}

impl PageSession {
    pub fn new(
        url: impl Into<String>,
        extractor: Arc<DomExtractor>,
        exporter: ExportBuilder,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            loaded_at: Utc::now(),
            store: SnapshotStore::new(),
            extractor,
            exporter,
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            id: self.id.to_string(),
            url: self.url.clone(),
            loaded_at: self.loaded_at.to_rfc3339(),
            ready: self.store.is_ready(),
        }
    }

    /// Run the extraction pass and store its snapshot.
    ///
    /// Suspends until the document contains a turn element, re-checking on
    /// every tick. Fails only when the session is closed first.
    pub async fn run_extraction(
        &self,
        document: &dyn DocumentSource,
        ticker: &mut dyn FrameTicker,
    ) -> Result<Arc<Snapshot>> {
        let extractor = self.extractor.clone();
        let conversation = wait_until_ready(ticker, &self.cancel, || {
            extractor.extract_if_rendered(&document.current_html())
        })
        .await
        .map_err(|e| match e {
            WaitError::Cancelled => Error::Cancelled(format!("page session {}", self.id)),
        })?;

        let snapshot = self.build_snapshot(conversation);
        if let Some(transcript) = &snapshot.transcript {
            let preview: String = transcript.chars().take(PREVIEW_CHARS).collect();
            debug!("Transcript preview: {}", preview);
        }

        let turns = snapshot.json.as_ref().map_or(0, |j| j.messages.len());
        let stored = self.store.set(snapshot);
        info!("Chat export ready: {} turns from {}", turns, self.url);
        Ok(stored)
    }

    /// Dedup repeated blocks inside each turn, then build both export forms.
    pub fn build_snapshot(&self, mut conversation: Conversation) -> Snapshot {
        for turn in conversation.turns.iter_mut() {
            if !turn.text.is_empty() {
                turn.text = dedupe_text_blocks(&turn.text);
            }
        }

        Snapshot {
            json: Some(self.exporter.build_export(&conversation)),
            transcript: Some(build_context_transcript(&conversation.turns)),
        }
    }

    /// Answer a request from the popup.
    pub fn respond(&self, request: PageRequest) -> Option<Arc<Snapshot>> {
        match request {
            PageRequest::GetChatExport => self.store.get(),
        }
    }

    /// Stop a pending extraction pass.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
