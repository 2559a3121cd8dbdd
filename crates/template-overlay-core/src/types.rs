//! Core types shared by the overlay components.
//!
//! These types are designed to be:
//! - Host-agnostic (no editor or LSP protocol dependencies)
//! - Easily serializable to JSON (settings values and wire payloads)
//! - Easily convertible to `lsp-types` (for the native language server)
//!
//! Positions use 0-based line and character indices, matching the LSP
//! specification. Offsets are UTF-8 byte offsets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stored template: a name and the full reference text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Template {
    /// The unique, user-chosen name of the template.
    pub name: String,
    /// The diffable content of the template.
    pub content: String,
}

impl Template {
    /// Create a new template.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A half-open span of byte offsets into a document's current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OffsetRange {
    /// First byte of the span.
    pub start: usize,
    /// One past the last byte of the span.
    pub end: usize,
}

impl OffsetRange {
    /// Create a new offset range.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "offset range start after end");
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A position in a text document, expressed as zero-based line and character offset.
///
/// Character offsets are measured in UTF-16 code units to match the LSP specification.
/// For ASCII text, this is equivalent to the character index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based character offset (UTF-16 code units).
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.character.cmp(&other.character),
            ord => ord,
        }
    }
}

/// A range in a text document, expressed as start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    /// The range's start position (inclusive).
    pub start: Position,
    /// The range's end position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Check if this range is empty (zero-width).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Stable identity of an open document.
///
/// Allocated by the [`DocumentStore`](crate::DocumentStore) on open and never
/// reused, so a document that is closed and reopened gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Host-supplied identity of one visible editor pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(String);

impl EditorId {
    /// Create a new editor id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An editor pane the host currently shows, and the document URI it displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleEditor {
    /// The editor pane.
    pub id: EditorId,
    /// URI of the document shown in the pane.
    pub uri: String,
}

impl VisibleEditor {
    /// Create a new visible editor entry.
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: EditorId::new(id),
            uri: uri.into(),
        }
    }
}

/// The visual attributes painted over unchanged template text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorationStyle {
    /// Text opacity in `0.0..=1.0`.
    pub opacity: f32,
}

impl Default for DecorationStyle {
    fn default() -> Self {
        Self { opacity: 0.4 }
    }
}

/// A change to the decoration of one editor pane.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationUpdate {
    /// Replace the editor's decoration with `ranges` painted in `style`.
    Apply {
        editor: EditorId,
        uri: String,
        style: DecorationStyle,
        ranges: Vec<Range>,
    },
    /// Remove all template decoration from the editor.
    Clear { editor: EditorId, uri: String },
}

impl DecorationUpdate {
    /// The editor pane this update targets.
    pub fn editor(&self) -> &EditorId {
        match self {
            DecorationUpdate::Apply { editor, .. } | DecorationUpdate::Clear { editor, .. } => {
                editor
            }
        }
    }

    /// The URI of the document displayed in the targeted editor.
    pub fn uri(&self) -> &str {
        match self {
            DecorationUpdate::Apply { uri, .. } | DecorationUpdate::Clear { uri, .. } => uri,
        }
    }

    /// The decorated ranges; empty for [`DecorationUpdate::Clear`].
    pub fn ranges(&self) -> &[Range] {
        match self {
            DecorationUpdate::Apply { ranges, .. } => ranges,
            DecorationUpdate::Clear { .. } => &[],
        }
    }
}
