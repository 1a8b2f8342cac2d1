//! Output sinks for the copy and save actions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chatsnap_core::Result;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Destination of the copy action.
#[async_trait]
pub trait Clipboard: Send {
    async fn write_text(&mut self, text: &str) -> Result<()>;
}

/// A file offered for download by the save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub name: String,
    pub content_type: String,
    pub body: String,
}

/// Destination of the save action.
#[async_trait]
pub trait DownloadSink: Send {
    async fn save(&mut self, file: DownloadFile) -> Result<()>;
}

/// Clipboard stand-in that prints to stdout.
#[derive(Debug, Default)]
pub struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Saves downloads into a directory under their own file name.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn save(&mut self, file: DownloadFile) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&file.name);
        tokio::fs::write(&path, file.body.as_bytes()).await?;
        info!("Saved {} ({})", path.display(), file.content_type);
        Ok(())
    }
}
