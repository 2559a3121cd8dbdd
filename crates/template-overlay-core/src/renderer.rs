//! Turning tracker state into decoration updates.

use tracing::debug;

use crate::document::Document;
use crate::ranges::compute_template_ranges;
use crate::tracker::ActivationTracker;
use crate::types::{DecorationStyle, DecorationUpdate, Range, VisibleEditor};

/// Computes the decoration of a document for every editor showing it.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: DecorationStyle,
}

impl Renderer {
    pub fn new(style: DecorationStyle) -> Self {
        Self { style }
    }

    /// Recompute the decoration of `document`.
    ///
    /// Every editor in `visible` that displays the document gets the same
    /// update: the template ranges when a template is active, a clear
    /// otherwise. Documents not shown in any editor produce no updates.
    pub fn render_for_document(
        &self,
        tracker: &ActivationTracker,
        document: &Document,
        visible: &[VisibleEditor],
    ) -> Vec<DecorationUpdate> {
        let editors: Vec<&VisibleEditor> = visible
            .iter()
            .filter(|editor| editor.uri == document.uri())
            .collect();
        if editors.is_empty() {
            return Vec::new();
        }

        let Some(template) = tracker.active(document.id()) else {
            return editors
                .into_iter()
                .map(|editor| DecorationUpdate::Clear {
                    editor: editor.id.clone(),
                    uri: editor.uri.clone(),
                })
                .collect();
        };

        let ranges: Vec<Range> = compute_template_ranges(template, document.content())
            .into_iter()
            .map(|range| document.offset_range_to_range(range))
            .collect();
        debug!(
            uri = %document.uri(),
            template = %template.name,
            ranges = ranges.len(),
            editors = editors.len(),
            "Rendering template"
        );

        editors
            .into_iter()
            .map(|editor| DecorationUpdate::Apply {
                editor: editor.id.clone(),
                uri: editor.uri.clone(),
                style: self.style,
                ranges: ranges.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStore;
    use crate::types::{EditorId, Position, Template};

    fn setup(text: &str) -> (DocumentStore, crate::types::DocumentId) {
        let mut store = DocumentStore::new();
        let id = store.open("file:///a.md", text, None);
        (store, id)
    }

    #[test]
    fn applies_ranges_to_every_split() {
        let (store, id) = setup("A\nX\nC\n");
        let mut tracker = ActivationTracker::new();
        tracker.enable(id, Template::new("t", "A\nB\nC\n"));

        let visible = [
            VisibleEditor::new("left", "file:///a.md"),
            VisibleEditor::new("other", "file:///b.md"),
            VisibleEditor::new("right", "file:///a.md"),
        ];
        let updates =
            Renderer::default().render_for_document(&tracker, store.get(id).unwrap(), &visible);

        let expected = vec![
            Range::new(Position::new(0, 0), Position::new(1, 0)),
            Range::new(Position::new(2, 0), Position::new(3, 0)),
        ];
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].editor(), &EditorId::new("left"));
        assert_eq!(updates[1].editor(), &EditorId::new("right"));
        for update in &updates {
            assert_eq!(update.ranges(), expected.as_slice());
        }
    }

    #[test]
    fn clears_without_active_template() {
        let (store, id) = setup("A\n");
        let tracker = ActivationTracker::new();
        let visible = [VisibleEditor::new("e1", "file:///a.md")];

        let updates =
            Renderer::default().render_for_document(&tracker, store.get(id).unwrap(), &visible);
        assert_eq!(
            updates,
            vec![DecorationUpdate::Clear {
                editor: EditorId::new("e1"),
                uri: "file:///a.md".to_string(),
            }]
        );
    }

    #[test]
    fn skips_documents_without_visible_editor() {
        let (store, id) = setup("A\n");
        let mut tracker = ActivationTracker::new();
        tracker.enable(id, Template::new("t", "A\n"));

        let updates = Renderer::default().render_for_document(&tracker, store.get(id).unwrap(), &[]);
        assert!(updates.is_empty());
    }

    #[test]
    fn carries_the_configured_style() {
        let (store, id) = setup("A\n");
        let mut tracker = ActivationTracker::new();
        tracker.enable(id, Template::new("t", "A\n"));
        let renderer = Renderer::new(DecorationStyle { opacity: 0.6 });

        let updates = renderer.render_for_document(
            &tracker,
            store.get(id).unwrap(),
            &[VisibleEditor::new("e1", "file:///a.md")],
        );
        match &updates[0] {
            DecorationUpdate::Apply { style, .. } => assert_eq!(style.opacity, 0.6),
            other => panic!("expected apply, got {other:?}"),
        }
    }
}
