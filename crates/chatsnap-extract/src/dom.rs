//! DOM walker that turns rendered chat turn elements into a [`Conversation`].
//!
//! Shape problems are never errors: a turn without a role attribute, a
//! missing text container or an empty markdown block simply contributes
//! nothing.

use std::collections::HashSet;

use chatsnap_core::{
    dedup_key, Conversation, DomSelectors, Error, Result, Role, Row, Table, Turn,
};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::normalize::normalize_text;

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Config(format!("invalid selector {:?}: {}", css, e)))
}

/// Pre-compiled selectors for one DOM shape.
#[derive(Debug)]
struct CompiledSelectors {
    turn: Selector,
    user_text: Selector,
    assistant_scope: Selector,
    markdown: Selector,
    prose: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
}

/// Extracts conversations from chat page markup.
#[derive(Debug)]
pub struct DomExtractor {
    selectors: CompiledSelectors,
    role_attr: String,
    id_attr: String,
}

impl DomExtractor {
    /// Compile the configured selectors.
    pub fn new(config: &DomSelectors) -> Result<Self> {
        Ok(Self {
            selectors: CompiledSelectors {
                turn: compile(&config.turn)?,
                user_text: compile(&config.user_text)?,
                assistant_scope: compile(&config.assistant_scope)?,
                markdown: compile(&config.markdown)?,
                prose: compile(&config.prose)?,
                table: compile(&config.table)?,
                row: compile(&config.row)?,
                cell: compile(&config.cell)?,
            },
            role_attr: config.role_attr.clone(),
            id_attr: config.id_attr.clone(),
        })
    }

    /// All turn root elements of a parsed document, in document order.
    pub fn turn_elements<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.selectors.turn).collect()
    }

    /// Extract a conversation only once the markup contains a turn element.
    ///
    /// Returns `None` while the page is still rendering. A rendered page whose
    /// turns are all empty yields `Some` of an empty conversation.
    pub fn extract_if_rendered(&self, html: &str) -> Option<Conversation> {
        let document = Html::parse_document(html);
        let elements = self.turn_elements(&document);
        if elements.is_empty() {
            return None;
        }
        Some(self.extract(&elements))
    }

    /// Parse markup and extract its conversation.
    pub fn extract_document(&self, html: &str) -> Conversation {
        let document = Html::parse_document(html);
        let elements = self.turn_elements(&document);
        self.extract(&elements)
    }

    /// Extract a conversation from turn root elements.
    ///
    /// Turns are deduplicated on `(role, normalized text)`. A later turn with
    /// the same key is dropped even when its tables differ.
    pub fn extract(&self, elements: &[ElementRef<'_>]) -> Conversation {
        let mut seen = HashSet::new();
        let mut turns = Vec::new();

        for element in elements {
            let Some(role_value) = element.value().attr(&self.role_attr) else {
                debug!("Skipping turn element without {}", self.role_attr);
                continue;
            };

            // Unrecognised roles have no content containers to read from.
            let Some(role) = Role::from_name(role_value) else {
                debug!("Skipping turn element with role {:?}", role_value);
                continue;
            };

            let (text, tables) = match role {
                Role::User => (self.user_text(element), Vec::new()),
                Role::Assistant => self.assistant_content(element),
            };

            let normalized = normalize_text(&text);
            if normalized.is_empty() && tables.is_empty() {
                continue;
            }

            if !seen.insert(dedup_key(role, &normalized)) {
                debug!("Skipping duplicate {} turn", role);
                continue;
            }

            turns.push(Turn {
                role,
                id: element
                    .value()
                    .attr(&self.id_attr)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
                text: normalized,
                tables: if tables.is_empty() { None } else { Some(tables) },
            });
        }

        Conversation::new(turns)
    }

    fn user_text(&self, element: &ElementRef<'_>) -> String {
        element
            .select(&self.selectors.user_text)
            .next()
            .map(|el| rendered_text(&el).trim().to_string())
            .unwrap_or_default()
    }

    fn assistant_content(&self, element: &ElementRef<'_>) -> (String, Vec<Table>) {
        let markdown = element
            .select(&self.selectors.assistant_scope)
            .next()
            .and_then(|scope| scope.select(&self.selectors.markdown).next());

        match markdown {
            Some(markdown) => (self.prose_view(&markdown), self.table_view(&markdown)),
            None => (String::new(), Vec::new()),
        }
    }

    /// Block-level text in document order, one blank line between entries.
    fn prose_view(&self, markdown: &ElementRef<'_>) -> String {
        markdown
            .select(&self.selectors.prose)
            .map(|node| text_content(&node).trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn table_view(&self, markdown: &ElementRef<'_>) -> Vec<Table> {
        markdown
            .select(&self.selectors.table)
            .map(|table| {
                table
                    .select(&self.selectors.row)
                    .map(|row| {
                        row.select(&self.selectors.cell)
                            .map(|cell| text_content(&cell).trim().to_string())
                            .filter(|text| !text.is_empty())
                            .collect::<Row>()
                    })
                    .filter(|row| !row.is_empty())
                    .collect::<Table>()
            })
            .filter(|table| !table.is_empty())
            .collect()
    }
}

fn text_content(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Elements that start and end on their own line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "pre", "section", "summary", "table", "tr",
    "ul",
];

/// Text as a browser lays it out, with `<br>` and block boundaries as line
/// breaks. Script and style contents are not rendered.
fn rendered_text(element: &ElementRef<'_>) -> String {
    let mut text = RenderedText::default();
    text.walk(element);
    text.out
}

#[derive(Default)]
struct RenderedText {
    out: String,
    /// Line breaks owed before the next piece of text.
    pending: usize,
}

impl RenderedText {
    fn walk(&mut self, element: &ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push(text),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    match child.value().name() {
                        "script" | "style" | "template" | "noscript" => {}
                        "br" => self.push("\n"),
                        "p" => self.block(&child, 2),
                        name if BLOCK_ELEMENTS.contains(&name) => self.block(&child, 1),
                        _ => self.walk(&child),
                    }
                }
                _ => {}
            }
        }
    }

    fn block(&mut self, element: &ElementRef<'_>, breaks: usize) {
        self.request(breaks);
        self.walk(element);
        self.request(breaks);
    }

    fn request(&mut self, breaks: usize) {
        if !self.out.is_empty() {
            self.pending = self.pending.max(breaks);
        }
    }

    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for _ in 0..self.pending {
            self.out.push('\n');
        }
        self.pending = 0;
        self.out.push_str(text);
    }
}
