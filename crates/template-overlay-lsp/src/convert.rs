//! Conversion between template-overlay-core types and tower_lsp::lsp_types.

use tower_lsp::lsp_types::{Position as LspPosition, Range as LspRange};

use template_overlay_core::types::{
    DecorationStyle, DecorationUpdate, Position, Range, VisibleEditor,
};

use crate::protocol::{DecorationsParams, VisibleEditorItem};

/// Convert a template-overlay-core Position to an lsp-types Position.
pub fn position_to_lsp(pos: &Position) -> LspPosition {
    LspPosition {
        line: pos.line,
        character: pos.character,
    }
}

/// Convert a template-overlay-core Range to an lsp-types Range.
pub fn range_to_lsp(range: &Range) -> LspRange {
    LspRange {
        start: position_to_lsp(&range.start),
        end: position_to_lsp(&range.end),
    }
}

/// Convert a decoration update to the `templateOverlay/decorations` payload.
///
/// A clear is sent as an empty range list.
pub fn decoration_to_params(update: &DecorationUpdate) -> DecorationsParams {
    match update {
        DecorationUpdate::Apply {
            editor,
            uri,
            style,
            ranges,
        } => DecorationsParams {
            editor: editor.as_str().to_string(),
            uri: uri.clone(),
            opacity: style.opacity,
            ranges: ranges.iter().map(range_to_lsp).collect(),
        },
        DecorationUpdate::Clear { editor, uri } => DecorationsParams {
            editor: editor.as_str().to_string(),
            uri: uri.clone(),
            opacity: DecorationStyle::default().opacity,
            ranges: Vec::new(),
        },
    }
}

pub fn visible_editor_from_lsp(item: VisibleEditorItem) -> VisibleEditor {
    VisibleEditor::new(item.id, item.uri.to_string())
}
