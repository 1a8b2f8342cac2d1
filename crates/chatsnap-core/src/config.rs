//! Configuration loading and persistence.
//!
//! Values come from a JSON file when one exists (see [`ChatsnapConfig::load`]),
//! fall back to defaults field by field, and are finally overridden by
//! environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3017;
pub const DEFAULT_SOURCE: &str = "chat.openai.com";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "chat-export.json";
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
pub const DEFAULT_CONFIG_FILE: &str = "chatsnap.json";

/// CSS selectors and attribute names describing the chat page's DOM shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomSelectors {
    /// Root element of one conversation turn.
    #[serde(default = "default_turn")]
    pub turn: String,
    /// Attribute on the turn element carrying the role.
    #[serde(default = "default_role_attr")]
    pub role_attr: String,
    /// Optional attribute on the turn element carrying an opaque id.
    #[serde(default = "default_id_attr")]
    pub id_attr: String,
    /// Whitespace-preserving container holding user text.
    #[serde(default = "default_user_text")]
    pub user_text: String,
    /// Author-scoped container wrapping assistant content.
    #[serde(default = "default_assistant_scope")]
    pub assistant_scope: String,
    /// Rendered-markdown container inside the assistant scope.
    #[serde(default = "default_markdown")]
    pub markdown: String,
    /// Block elements that make up the prose view.
    #[serde(default = "default_prose")]
    pub prose: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_row")]
    pub row: String,
    #[serde(default = "default_cell")]
    pub cell: String,
}

fn default_turn() -> String {
    "article[data-turn]".into()
}
fn default_role_attr() -> String {
    "data-turn".into()
}
fn default_id_attr() -> String {
    "data-turn-id".into()
}
fn default_user_text() -> String {
    ".whitespace-pre-wrap".into()
}
fn default_assistant_scope() -> String {
    r#"[data-message-author-role="assistant"]"#.into()
}
fn default_markdown() -> String {
    ".markdown".into()
}
fn default_prose() -> String {
    "p, li, h1, h2, h3, h4, pre".into()
}
fn default_table() -> String {
    "table".into()
}
fn default_row() -> String {
    "tr".into()
}
fn default_cell() -> String {
    "th, td".into()
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            turn: default_turn(),
            role_attr: default_role_attr(),
            id_attr: default_id_attr(),
            user_text: default_user_text(),
            assistant_scope: default_assistant_scope(),
            markdown: default_markdown(),
            prose: default_prose(),
            table: default_table(),
            row: default_row(),
            cell: default_cell(),
        }
    }
}

/// Top-level Chatsnap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatsnapConfig {
    /// Page-host HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL the popup transport talks to.
    #[serde(default = "default_host_url")]
    pub host_url: String,
    /// Literal written to `meta.source`.
    #[serde(default = "default_source")]
    pub source: String,
    /// Name of the file produced by the save action.
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    /// Display-refresh tick period used while waiting for turn elements.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default)]
    pub selectors: DomSelectors,
    /// Path to config file (not serialized).
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_host_url() -> String {
    format!("http://127.0.0.1:{}", DEFAULT_PORT)
}
fn default_source() -> String {
    DEFAULT_SOURCE.into()
}
fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.into()
}
fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

impl Default for ChatsnapConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host_url: default_host_url(),
            source: DEFAULT_SOURCE.into(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.into(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            selectors: DomSelectors::default(),
            config_path: PathBuf::new(),
        }
    }
}

impl ChatsnapConfig {
    /// Load config from a JSON file, or return defaults.
    ///
    /// A missing or unparsable file is not an error.
    pub fn load(config_path: &Path) -> Self {
        let mut config: ChatsnapConfig = match std::fs::read_to_string(config_path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Ignoring invalid config {}: {}", config_path.display(), e);
                Self::default()
            }),
            Err(_) => {
                debug!("No config at {}, using defaults", config_path.display());
                Self::default()
            }
        };
        config.config_path = config_path.to_path_buf();
        config
    }

    /// Load config from `CHATSNAP_CONFIG` (or `chatsnap.json`) and apply env overrides.
    pub fn from_env() -> Self {
        let path = std::env::var("CHATSNAP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load(&path);
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Ok(url) = std::env::var("CHATSNAP_HOST_URL") {
            self.host_url = url;
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        if self.config_path.as_os_str().is_empty() {
            return Err(Error::Config("config path is not set".into()));
        }
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        Ok(())
    }

    /// Tick period for the readiness wait.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChatsnapConfig::load(&dir.path().join("nope.json"));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.source, "chat.openai.com");
        assert_eq!(config.export_file_name, "chat-export.json");
        assert_eq!(config.selectors, DomSelectors::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatsnap.json");
        std::fs::write(
            &path,
            r#"{ "source": "example.test", "selectors": { "turn": "div.turn" } }"#,
        )
        .unwrap();

        let config = ChatsnapConfig::load(&path);
        assert_eq!(config.source, "example.test");
        assert_eq!(config.selectors.turn, "div.turn");
        assert_eq!(config.selectors.role_attr, "data-turn");
        assert_eq!(config.frame_interval_ms, DEFAULT_FRAME_INTERVAL_MS);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatsnap.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = ChatsnapConfig::load(&path);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chatsnap.json");
        let mut config = ChatsnapConfig::load(&path);
        config.export_file_name = "dump.json".into();
        config.save().unwrap();

        let reloaded = ChatsnapConfig::load(&path);
        assert_eq!(reloaded.export_file_name, "dump.json");
    }

    #[test]
    fn test_save_without_path_fails() {
        let config = ChatsnapConfig::default();
        assert!(matches!(config.save(), Err(Error::Config(_))));
    }

    #[test]
    fn test_frame_interval_never_zero() {
        let config = ChatsnapConfig {
            frame_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.frame_interval(), std::time::Duration::from_millis(1));
    }
}
