//! JSON export assembly.

use chatsnap_core::{ChatExport, Conversation, ExportMeta};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::readme::readme;

/// Wraps conversations in the export metadata envelope.
#[derive(Debug, Clone)]
pub struct ExportBuilder {
    source: String,
}

impl ExportBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Build an export stamped with the current time.
    pub fn build_export(&self, conversation: &Conversation) -> ChatExport {
        self.build_export_at(conversation, Utc::now())
    }

    /// Build an export stamped with `exported_at`.
    ///
    /// Turns are copied as-is; nothing about them is validated.
    pub fn build_export_at(
        &self,
        conversation: &Conversation,
        exported_at: DateTime<Utc>,
    ) -> ChatExport {
        ChatExport {
            meta: ExportMeta {
                source: self.source.clone(),
                exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                readme: readme(),
            },
            messages: conversation.turns.clone(),
        }
    }
}
