//! The event dispatcher between a host and the overlay components.
//!
//! A [`Workspace`] owns the open documents, the set of visible editors, the
//! [`ActivationTracker`] and the [`Renderer`]. Hosts forward their document and
//! editor events to it as plain method calls; each call returns the
//! decoration updates the host must apply. Nothing here is async and nothing
//! here knows about a particular editor, so the whole state machine can be
//! driven with synthetic events in tests.

use tracing::{debug, info};

use crate::document::{Document, DocumentStore};
use crate::renderer::Renderer;
use crate::store::AutoActivationRule;
use crate::tracker::ActivationTracker;
use crate::types::{DecorationStyle, DecorationUpdate, DocumentId, Template, VisibleEditor};

#[derive(Debug, Default)]
pub struct Workspace {
    documents: DocumentStore,
    visible: Vec<VisibleEditor>,
    tracker: ActivationTracker,
    renderer: Renderer,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: DecorationStyle) -> Self {
        Self {
            renderer: Renderer::new(style),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    /// A document was opened.
    ///
    /// Opening a URI that is already open replaces the document; the previous
    /// one is retired as if it had been closed.
    pub fn open(
        &mut self,
        uri: &str,
        text: impl Into<String>,
        version: Option<i32>,
        rules: &[AutoActivationRule],
    ) -> (DocumentId, Vec<DecorationUpdate>) {
        if let Some(previous) = self.documents.id_of(uri) {
            debug!(%uri, document = %previous, "Replacing open document");
            self.tracker.on_close(previous);
        }
        let id = self.documents.open(uri, text, version);
        info!(%uri, document = %id, "Document opened");

        self.tracker.trigger(id, uri, rules);
        self.tracker.request_render(id);
        (id, self.flush())
    }

    /// An open document's text changed. Unknown URIs are ignored.
    pub fn change(
        &mut self,
        uri: &str,
        text: impl Into<String>,
        version: Option<i32>,
    ) -> Vec<DecorationUpdate> {
        match self.documents.change(uri, text, version) {
            Some(id) => {
                let version = self.documents.get(id).and_then(Document::version);
                debug!(%uri, document = %id, ?version, "Document changed");
                self.tracker.request_render(id);
                self.flush()
            }
            None => {
                debug!(%uri, "Change for unknown document");
                Vec::new()
            }
        }
    }

    /// A document was closed. Its association is dropped without clearing
    /// decoration, since its editors are gone.
    pub fn close(&mut self, uri: &str) -> Option<DocumentId> {
        let id = self.documents.close(uri)?;
        info!(%uri, document = %id, "Document closed");
        self.tracker.on_close(id);
        Some(id)
    }

    /// The set of visible editors changed.
    ///
    /// Every visible document is offered to auto-activation and re-rendered.
    pub fn set_visible_editors(
        &mut self,
        editors: Vec<VisibleEditor>,
        rules: &[AutoActivationRule],
    ) -> Vec<DecorationUpdate> {
        self.visible = editors;
        for (id, uri) in self.visible_documents() {
            self.tracker.trigger(id, &uri, rules);
            self.tracker.request_render(id);
        }
        self.flush()
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Activate `template` for `document`.
    ///
    /// A no-op when the document has been closed in the meantime, which
    /// happens when the caller awaited a prompt before getting here.
    pub fn enable(&mut self, document: DocumentId, template: Template) -> Vec<DecorationUpdate> {
        if !self.documents.contains(document) {
            debug!(%document, template = %template.name, "Document closed before enable");
            return Vec::new();
        }
        self.tracker.enable(document, template);
        self.flush()
    }

    /// Deactivate any template of `document`, clearing its decoration.
    pub fn disable(&mut self, document: DocumentId) -> Vec<DecorationUpdate> {
        if !self.documents.contains(document) {
            return Vec::new();
        }
        self.tracker.disable(document);
        self.flush()
    }

    pub fn suppress_auto_activation(&mut self, document: DocumentId) {
        self.tracker.suppress_auto_activation(document);
    }

    /// Re-allow auto-activation for all documents and re-evaluate the visible ones.
    pub fn clear_suppressed(&mut self, rules: &[AutoActivationRule]) -> Vec<DecorationUpdate> {
        let visible = self.visible_documents();
        self.tracker
            .clear_suppressed(visible.iter().map(|(id, uri)| (*id, uri.as_str())), rules);
        self.flush()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn has_active(&self, document: DocumentId) -> bool {
        self.tracker.has_active(document)
    }

    pub fn active_template(&self, document: DocumentId) -> Option<&Template> {
        self.tracker.active(document)
    }

    pub fn is_suppressed(&self, document: DocumentId) -> bool {
        self.tracker.is_suppressed(document)
    }

    pub fn document(&self, document: DocumentId) -> Option<&Document> {
        self.documents.get(document)
    }

    pub fn document_by_uri(&self, uri: &str) -> Option<&Document> {
        self.documents.get_by_uri(uri)
    }

    pub fn visible_editors(&self) -> &[VisibleEditor] {
        &self.visible
    }

    /// Open documents shown in at least one visible editor, in editor order.
    fn visible_documents(&self) -> Vec<(DocumentId, String)> {
        let mut documents: Vec<(DocumentId, String)> = Vec::new();
        for editor in &self.visible {
            if let Some(id) = self.documents.id_of(&editor.uri) {
                if !documents.iter().any(|(seen, _)| *seen == id) {
                    documents.push((id, editor.uri.clone()));
                }
            }
        }
        documents
    }

    /// Render every document with a pending render request.
    fn flush(&mut self) -> Vec<DecorationUpdate> {
        let mut updates = Vec::new();
        for id in self.tracker.take_render_requests() {
            if let Some(document) = self.documents.get(id) {
                updates.extend(
                    self.renderer
                        .render_for_document(&self.tracker, document, &self.visible),
                );
            }
        }
        updates
    }
}
