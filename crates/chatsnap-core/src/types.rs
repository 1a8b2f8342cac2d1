//! Conversation types shared by the page and popup sides.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse the role attribute value of a turn element.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One table row: non-empty cell texts in document order.
pub type Row = Vec<String>;

/// One table: non-empty rows in document order.
pub type Table = Vec<Row>;

/// A single role-attributed message extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub id: Option<String>,
    pub text: String,
    pub tables: Option<Vec<Table>>,
}

impl Turn {
    pub fn table_count(&self) -> usize {
        self.tables.as_ref().map_or(0, Vec::len)
    }
}

/// Build the `(role, normalized text)` dedup key.
pub fn dedup_key(role: Role, normalized_text: &str) -> String {
    format!("{}::{}", role.name(), normalized_text)
}

/// Chronological, deduplicated sequence of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    pub turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Static interpretation notes embedded in every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readme {
    pub purpose: String,
    pub perspective: String,
    pub context: Vec<String>,
    pub content_structure: Vec<String>,
    pub intended_use: Vec<String>,
    pub limitations: Vec<String>,
}

/// Metadata envelope of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub source: String,
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    pub readme: Readme,
}

/// JSON export document: metadata plus the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExport {
    pub meta: ExportMeta,
    pub messages: Vec<Turn>,
}

/// Result of one extraction pass, as handed to the popup.
///
/// A page-built snapshot always carries both forms; readers still check
/// each independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub json: Option<ChatExport>,
    #[serde(default)]
    pub transcript: Option<String>,
}

impl Snapshot {
    pub fn has_json(&self) -> bool {
        self.json.is_some()
    }

    pub fn has_transcript(&self) -> bool {
        self.transcript.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_names() {
        assert_eq!(Role::from_name("user"), Some(Role::User));
        assert_eq!(Role::from_name("assistant"), Some(Role::Assistant));
        assert_eq!(Role::from_name("system"), None);
        assert_eq!(Role::from_name(""), None);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_turn_json_shape() {
        let turn = Turn {
            role: Role::User,
            id: None,
            text: "Hello".into(),
            tables: None,
        };
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "role": "user", "id": null, "text": "Hello", "tables": null })
        );
    }

    #[test]
    fn test_dedup_key_separates_roles() {
        assert_ne!(dedup_key(Role::User, "hi"), dedup_key(Role::Assistant, "hi"));
        assert_eq!(dedup_key(Role::User, "hi"), "user::hi");
    }

    #[test]
    fn test_snapshot_missing_fields_deserialize() {
        let snapshot: Snapshot = serde_json::from_str(r#"{ "transcript": "T" }"#).unwrap();
        assert!(snapshot.has_transcript());
        assert!(!snapshot.has_json());

        let empty: Snapshot = serde_json::from_str(r#"{ "transcript": "" }"#).unwrap();
        assert!(!empty.has_transcript());
    }

    #[test]
    fn test_conversation_serializes_as_array() {
        let conv = Conversation::new(vec![Turn {
            role: Role::Assistant,
            id: Some("t1".into()),
            text: "x".into(),
            tables: Some(vec![vec![vec!["a".into()]]]),
        }]);
        let value = serde_json::to_value(&conv).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["tables"][0][0][0], "a");
        assert_eq!(conv.turns[0].table_count(), 1);
    }
}
