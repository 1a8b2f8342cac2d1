//! Sources of page markup for the extraction pass.

use parking_lot::RwLock;

/// Provides the page's current rendered markup.
pub trait DocumentSource: Send + Sync {
    fn current_html(&self) -> String;
}

/// Markup that changes while the page renders.
#[derive(Debug, Default)]
pub struct LiveDocument {
    html: RwLock<String>,
}

impl LiveDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: RwLock::new(html.into()),
        }
    }

    /// Replace the rendered markup.
    pub fn replace(&self, html: impl Into<String>) {
        *self.html.write() = html.into();
    }
}

impl DocumentSource for LiveDocument {
    fn current_html(&self) -> String {
        self.html.read().clone()
    }
}
