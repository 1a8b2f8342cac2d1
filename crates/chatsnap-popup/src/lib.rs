//! Popup side of the exporter.
//!
//! [`PopupClient`] asks the active page for its snapshot through a
//! [`PageTransport`], renders the transcript and performs the copy and save
//! actions through [`Clipboard`] and [`DownloadSink`].

pub mod client;
pub mod error;
pub mod http;
pub mod sinks;
pub mod transport;

pub use client::{PopupClient, PopupView};
pub use error::{FetchError, TransportError};
pub use http::HttpTransport;
pub use sinks::{Clipboard, DirectoryDownloads, DownloadFile, DownloadSink, StdoutClipboard};
pub use transport::{InProcessTransport, PageHandle, PageTransport};
