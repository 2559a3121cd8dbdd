//! Document abstraction for template matching.
//!
//! A [`Document`] holds the current full text of one open buffer together with
//! a [`LineIndex`], so byte offsets produced by the range mapper can be turned
//! into host positions. The [`DocumentStore`] owns every open document and
//! hands out [`DocumentId`]s that are never reused.

use std::collections::HashMap;

use crate::types::{DocumentId, OffsetRange, Position, Range};

/// An open document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Identity allocated on open.
    id: DocumentId,
    /// The document's URI.
    uri: String,
    /// The document content.
    content: String,
    /// Version number for tracking changes (optional, used by LSP).
    version: Option<i32>,
    lines: LineIndex,
}

impl Document {
    /// Create a new document with the given identity, URI and content.
    pub fn new(id: DocumentId, uri: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id,
            uri: uri.into(),
            lines: LineIndex::new(&content),
            content,
            version: None,
        }
    }

    /// Get the document's identity.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Get the document's URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the document's content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the document's version, if set.
    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// Get the last path segment of the URI, ignoring any query or fragment.
    pub fn filename(&self) -> &str {
        let path = self.uri.split(['?', '#']).next().unwrap_or(&self.uri);
        path.rsplit(['/', '\\']).next().unwrap_or(path)
    }

    /// Replace the document content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.lines = LineIndex::new(&self.content);
    }

    /// Replace the document content with a new version.
    pub fn set_content_with_version(&mut self, content: impl Into<String>, version: Option<i32>) {
        self.set_content(content);
        self.version = version;
    }

    /// Convert a byte offset into a line / UTF-16 column position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        self.lines.position(&self.content, offset)
    }

    /// Convert an offset range into a host range.
    pub fn offset_range_to_range(&self, range: OffsetRange) -> Range {
        self.lines.range(&self.content, range)
    }
}

/// Line start offsets of a text, for turning byte offsets into positions.
///
/// The index does not own the text; callers pass the same text it was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        Self {
            line_starts: std::iter::once(0)
                .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
                .collect(),
        }
    }

    /// Convert a byte offset into `text` to a line / UTF-16 column position.
    ///
    /// Offsets past the end clamp to the end of the text; offsets inside a
    /// multi-byte character snap back to the character's start.
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = text[line_start..offset].encode_utf16().count();

        Position::new(to_u32(line), to_u32(character))
    }

    pub fn range(&self, text: &str, range: OffsetRange) -> Range {
        Range::new(self.position(text, range.start), self.position(text, range.end))
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// A document store for managing open documents.
///
/// Documents are keyed by URI for host lookups and by [`DocumentId`] for the
/// overlay state, which must not confuse a reopened document with its
/// predecessor.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<DocumentId, Document>,
    by_uri: HashMap<String, DocumentId>,
    next_id: u64,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, allocating a fresh identity.
    ///
    /// Opening a URI that is already open replaces the old document, which
    /// loses its identity.
    pub fn open(
        &mut self,
        uri: impl Into<String>,
        content: impl Into<String>,
        version: Option<i32>,
    ) -> DocumentId {
        let uri = uri.into();
        if let Some(previous) = self.by_uri.remove(&uri) {
            self.documents.remove(&previous);
        }

        let id = DocumentId::new(self.next_id);
        self.next_id += 1;

        let mut doc = Document::new(id, uri.clone(), content);
        doc.version = version;
        self.by_uri.insert(uri, id);
        self.documents.insert(id, doc);
        id
    }

    /// Update a document's content. Returns the document's id if it is open.
    pub fn change(
        &mut self,
        uri: &str,
        content: impl Into<String>,
        version: Option<i32>,
    ) -> Option<DocumentId> {
        let id = *self.by_uri.get(uri)?;
        let doc = self.documents.get_mut(&id)?;
        doc.set_content_with_version(content, version);
        Some(id)
    }

    /// Close a document (remove from store). Returns its id if it was open.
    pub fn close(&mut self, uri: &str) -> Option<DocumentId> {
        let id = self.by_uri.remove(uri)?;
        self.documents.remove(&id);
        Some(id)
    }

    /// Get a document by identity.
    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Get a document by URI.
    pub fn get_by_uri(&self, uri: &str) -> Option<&Document> {
        self.by_uri.get(uri).and_then(|id| self.documents.get(id))
    }

    /// Get the identity of the open document with the given URI.
    pub fn id_of(&self, uri: &str) -> Option<DocumentId> {
        self.by_uri.get(uri).copied()
    }

    /// Check if a document is still open.
    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Get the number of documents in the store.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
