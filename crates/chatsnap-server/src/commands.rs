//! CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chatsnap_core::{ChatsnapConfig, Snapshot};
use chatsnap_export::ExportBuilder;
use chatsnap_extract::DomExtractor;
use chatsnap_page::PageSession;
use chatsnap_popup::{DirectoryDownloads, HttpTransport, PopupClient, StdoutClipboard};
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

/// Extract a saved conversation page without waiting for it to render.
pub fn extract_file(config: &ChatsnapConfig, path: &Path) -> anyhow::Result<Snapshot> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let extractor = Arc::new(DomExtractor::new(&config.selectors)?);
    let conversation = extractor.extract_document(&html);
    info!("Extracted {} turns from {}", conversation.len(), path.display());

    let session = PageSession::new(
        format!("file://{}", path.display()),
        extractor,
        ExportBuilder::new(config.source.clone()),
    );
    Ok(session.build_snapshot(conversation))
}

/// A page to load as soon as the host starts.
pub struct InitialPage {
    pub url: String,
    pub html: String,
}

impl InitialPage {
    pub fn from_file(path: &Path, url: Option<String>) -> anyhow::Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            url: url.unwrap_or_else(|| format!("file://{}", path.display())),
            html,
        })
    }
}

/// Run the page host until the process is stopped.
pub async fn serve(config: ChatsnapConfig, initial: Option<InitialPage>) -> anyhow::Result<()> {
    let port = config.port;
    let state = Arc::new(AppState::new(config)?);

    if let Some(page) = initial {
        state.host.load(page.url, page.html);
    }

    let app = build_router(state);
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Chatsnap page host listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    Show,
    Copy,
    Save,
}

impl PopupAction {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "show" => Some(Self::Show),
            "copy" => Some(Self::Copy),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// Open a popup against a running page host and perform one action.
///
/// Returns whether the action produced output (a transcript or a file).
pub async fn popup(
    config: &ChatsnapConfig,
    action: PopupAction,
    out_dir: PathBuf,
) -> anyhow::Result<bool> {
    let transport = HttpTransport::new(config.host_url.clone());
    let mut client = PopupClient::new(transport, config.export_file_name.clone());

    match action {
        PopupAction::Show => {
            client.refresh().await;
            println!("{}", client.view().output);
            Ok(client.view().copy_enabled || client.view().save_enabled)
        }
        PopupAction::Copy => Ok(client.copy(&mut StdoutClipboard).await?),
        PopupAction::Save => {
            let mut downloads = DirectoryDownloads::new(&out_dir);
            let saved = client.save(&mut downloads).await?;
            if !saved {
                eprintln!("{}", client.view().output);
            }
            Ok(saved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <article data-turn="user"><div class="whitespace-pre-wrap">Compare A and B</div></article>
        <article data-turn="assistant"><div data-message-author-role="assistant"><div class="markdown">
            <p>Here you go.</p>
            <table><tr><th>Name</th><th>Score</th></tr><tr><td>A</td><td>1</td></tr></table>
        </div></div></article>
    </body></html>"#;

    #[test]
    fn test_extract_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.html");
        std::fs::write(&path, PAGE).unwrap();

        let snapshot = extract_file(&ChatsnapConfig::default(), &path).unwrap();
        let json = snapshot.json.unwrap();
        assert_eq!(json.messages.len(), 2);
        assert_eq!(json.messages[1].text, "Here you go.");
        assert_eq!(json.messages[1].table_count(), 1);
        assert!(snapshot.transcript.unwrap().contains("USER:\nCompare A and B"));
    }

    #[test]
    fn test_extract_missing_file() {
        let err = extract_file(&ChatsnapConfig::default(), Path::new("/nonexistent/chat.html"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_popup_action_names() {
        assert_eq!(PopupAction::parse("copy"), Some(PopupAction::Copy));
        assert_eq!(PopupAction::parse("save"), Some(PopupAction::Save));
        assert_eq!(PopupAction::parse("show"), Some(PopupAction::Show));
        assert_eq!(PopupAction::parse("paste"), None);
    }
}
