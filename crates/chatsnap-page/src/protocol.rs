//! Messages exchanged between the popup and the page.

use serde::{Deserialize, Serialize};

/// Request kinds the page listens for.
///
/// The reply to [`PageRequest::GetChatExport`] is `Option<Snapshot>`:
/// `None` until the extraction pass has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageRequest {
    #[serde(rename = "GET_CHAT_EXPORT")]
    GetChatExport,
}

/// Summary of the page currently loaded in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub url: String,
    #[serde(rename = "loadedAt")]
    pub loaded_at: String,
    /// Whether the extraction pass has stored a snapshot.
    pub ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_value(PageRequest::GetChatExport).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "GET_CHAT_EXPORT" }));

        let parsed: PageRequest = serde_json::from_str(r#"{"type":"GET_CHAT_EXPORT"}"#).unwrap();
        assert_eq!(parsed, PageRequest::GetChatExport);
    }

    #[test]
    fn test_unknown_request_rejected() {
        assert!(serde_json::from_str::<PageRequest>(r#"{"type":"PING"}"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{}"#).is_err());
    }
}
