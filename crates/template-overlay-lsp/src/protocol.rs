//! Custom LSP messages exchanged with the editor-side client.
//!
//! LSP has no notion of visible editors, decorations or writable client
//! settings, so the client and server agree on three extra messages:
//!
//! | direction | kind | method |
//! |-----------|------|--------|
//! | client → server | notification | `templateOverlay/didChangeVisibleEditors` |
//! | server → client | notification | `templateOverlay/decorations` |
//! | server → client | request | `templateOverlay/updateSetting` |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::request::Request;
use tower_lsp::lsp_types::{Range, Url};

/// One editor pane the client currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleEditorItem {
    /// Client-chosen identifier, stable while the pane exists.
    pub id: String,
    /// The document displayed in the pane.
    pub uri: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleEditorsParams {
    /// Every visible editor, replacing the previous set.
    pub editors: Vec<VisibleEditorItem>,
}

/// Sent by the client whenever the set of visible editors changes.
pub enum DidChangeVisibleEditors {}

impl Notification for DidChangeVisibleEditors {
    type Params = VisibleEditorsParams;
    const METHOD: &'static str = "templateOverlay/didChangeVisibleEditors";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationsParams {
    /// The editor pane to decorate.
    pub editor: String,
    /// The document shown in that pane.
    pub uri: String,
    /// Opacity of the decorated text.
    pub opacity: f32,
    /// Ranges to dim. Empty clears the pane's decoration.
    pub ranges: Vec<Range>,
}

/// Replaces the template decoration of one editor pane.
pub enum Decorations {}

impl Notification for Decorations {
    type Params = DecorationsParams;
    const METHOD: &'static str = "templateOverlay/decorations";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingParams {
    /// Settings section, always `templateOverlay`.
    pub section: String,
    /// Key inside the section (`list` or `autoActivate`).
    pub key: String,
    /// The new value.
    pub value: Value,
}

/// Asks the client to persist a setting. An error response means the write
/// was rejected.
pub enum UpdateSetting {}

impl Request for UpdateSetting {
    type Params = UpdateSettingParams;
    type Result = ();
    const METHOD: &'static str = "templateOverlay/updateSetting";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_editors_deserialize() {
        let params: VisibleEditorsParams = serde_json::from_value(serde_json::json!({
            "editors": [{"id": "e1", "uri": "file:///a.md"}]
        }))
        .unwrap();
        assert_eq!(params.editors[0].id, "e1");
        assert_eq!(params.editors[0].uri.as_str(), "file:///a.md");
    }

    #[test]
    fn method_names() {
        assert_eq!(
            DidChangeVisibleEditors::METHOD,
            "templateOverlay/didChangeVisibleEditors"
        );
        assert_eq!(Decorations::METHOD, "templateOverlay/decorations");
        assert_eq!(UpdateSetting::METHOD, "templateOverlay/updateSetting");
    }
}
