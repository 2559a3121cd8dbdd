//! Which template is active for which document.
//!
//! The [`ActivationTracker`] owns the document → template association and the
//! set of documents whose auto-activation the user switched off. It never
//! touches the host: every change that needs the decoration refreshed queues
//! a render request, which the [`Workspace`](crate::Workspace) drains and hands
//! to the [`Renderer`](crate::Renderer).

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::store::AutoActivationRule;
use crate::types::{DocumentId, Template};

#[derive(Debug, Default)]
pub struct ActivationTracker {
    active: HashMap<DocumentId, Template>,
    /// Documents excluded from auto-activation until [`Self::clear_suppressed`].
    ///
    /// Entries survive [`Self::on_close`]; ids are never reused, so an entry
    /// for a closed document is inert.
    suppressed: HashSet<DocumentId>,
    pending_renders: Vec<DocumentId>,
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `template` for `document`, replacing any active template.
    pub fn enable(&mut self, document: DocumentId, template: Template) {
        debug!(%document, template = %template.name, "Enabling template");
        self.active.insert(document, template);
        self.request_render(document);
    }

    /// Deactivate the template of `document`, if any.
    pub fn disable(&mut self, document: DocumentId) {
        if let Some(template) = self.active.remove(&document) {
            debug!(%document, template = %template.name, "Disabling template");
        }
        self.request_render(document);
    }

    pub fn has_active(&self, document: DocumentId) -> bool {
        self.active.contains_key(&document)
    }

    pub fn active(&self, document: DocumentId) -> Option<&Template> {
        self.active.get(&document)
    }

    /// Stop auto-activation for `document`. An active template stays active.
    pub fn suppress_auto_activation(&mut self, document: DocumentId) {
        self.suppressed.insert(document);
    }

    pub fn is_suppressed(&self, document: DocumentId) -> bool {
        self.suppressed.contains(&document)
    }

    /// Re-allow auto-activation everywhere and re-evaluate it for `visible`.
    pub fn clear_suppressed<'a>(
        &mut self,
        visible: impl IntoIterator<Item = (DocumentId, &'a str)>,
        rules: &[AutoActivationRule],
    ) {
        self.suppressed.clear();
        for (document, uri) in visible {
            self.trigger(document, uri, rules);
        }
    }

    /// Auto-activate a template for `document` if no template is active, the
    /// document is not suppressed, and a rule matches its URI.
    ///
    /// Rules are tried in order and the first match wins. Returns whether a
    /// template was enabled.
    pub fn trigger(&mut self, document: DocumentId, uri: &str, rules: &[AutoActivationRule]) -> bool {
        if self.has_active(document) || self.is_suppressed(document) {
            return false;
        }

        match rules.iter().find(|rule| rule.matches(uri)) {
            Some(rule) => {
                debug!(%document, %uri, pattern = %rule.pattern, "Auto-activating template");
                self.enable(document, rule.template.clone());
                true
            }
            None => false,
        }
    }

    /// Forget the association of a closed document.
    pub fn on_close(&mut self, document: DocumentId) {
        self.active.remove(&document);
        self.pending_renders.retain(|pending| *pending != document);
    }

    /// Ask for `document`'s decoration to be recomputed.
    pub fn request_render(&mut self, document: DocumentId) {
        if !self.pending_renders.contains(&document) {
            self.pending_renders.push(document);
        }
    }

    /// Drain the queued render requests, oldest first.
    pub fn take_render_requests(&mut self) -> Vec<DocumentId> {
        std::mem::take(&mut self.pending_renders)
    }
}
