//! Page side of the exporter.
//!
//! A [`PageSession`] lives for one page load: it runs the extraction pass,
//! keeps the resulting snapshot in its [`SnapshotStore`] and answers
//! [`PageRequest`]s. [`PageHost`] owns the current session and replaces it
//! on every (re)load.

pub mod document;
pub mod host;
pub mod protocol;
pub mod session;
pub mod store;

pub use document::{DocumentSource, LiveDocument};
pub use host::PageHost;
pub use protocol::{PageInfo, PageRequest};
pub use session::PageSession;
pub use store::SnapshotStore;
