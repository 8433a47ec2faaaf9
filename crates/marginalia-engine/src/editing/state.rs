use std::ops::Range;
use std::sync::Arc;

use crate::anchors::{AnchorState, AnnotationId};
use crate::editing::commands::apply_transaction;
use crate::editing::{Patch, Transaction};
use crate::models::{Document, DocumentError};
use crate::settings::EngineSettings;

/// Selection as anchor (where it started) and head (where the caret is).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Immutable editor snapshot: document, selection and the anchor state
/// derived from that exact document.
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Arc<Document>,
    selection: Selection,
    anchors: AnchorState,
    version: u64,
}

impl EditorState {
    pub fn new(doc: Document, settings: &EngineSettings) -> Self {
        let anchors = AnchorState::new(&doc, settings.style.clone());
        Self {
            doc: Arc::new(doc),
            selection: Selection::default(),
            anchors,
            version: 0,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn shared_doc(&self) -> Arc<Document> {
        Arc::clone(&self.doc)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn anchors(&self) -> &AnchorState {
        &self.anchors
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Same snapshot with another selection. Not a commit: the version and
    /// the anchor state stay as they are.
    pub fn with_selection(&self, selection: Selection) -> Result<Self, DocumentError> {
        self.doc.resolve(selection.anchor)?;
        self.doc.resolve(selection.head)?;
        Ok(Self {
            selection,
            ..self.clone()
        })
    }

    /// Same snapshot with another active annotation. Not a commit.
    pub fn with_active_annotation(&self, id: Option<AnnotationId>) -> Self {
        Self {
            anchors: self.anchors.with_active(id),
            ..self.clone()
        }
    }

    /// Commit `tx`, producing the next snapshot. `self` is left untouched,
    /// also when a command fails.
    pub fn apply(&self, tx: &Transaction) -> Result<(EditorState, Patch), DocumentError> {
        let applied = apply_transaction(&self.doc, tx)?;

        let selection = match tx.selection() {
            Some(selection) => {
                applied.doc.resolve(selection.anchor)?;
                applied.doc.resolve(selection.head)?;
                selection
            }
            None => Selection::new(
                applied.mapping.map(self.selection.anchor, true),
                applied.mapping.map(self.selection.head, true),
            ),
        };

        Ok(self.commit(applied.doc, selection, applied.changed))
    }

    /// Commit a whole replacement document, as undo and redo do.
    pub(crate) fn replace(&self, doc: Arc<Document>, selection: Selection) -> (EditorState, Patch) {
        let changed = vec![0..doc.size()];
        self.commit_shared(doc, selection, changed)
    }

    fn commit(
        &self,
        doc: Document,
        selection: Selection,
        changed: Vec<Range<usize>>,
    ) -> (EditorState, Patch) {
        self.commit_shared(Arc::new(doc), selection, changed)
    }

    fn commit_shared(
        &self,
        doc: Arc<Document>,
        selection: Selection,
        changed: Vec<Range<usize>>,
    ) -> (EditorState, Patch) {
        let version = self.version + 1;
        let (anchors, change) = self.anchors.apply(&doc, version);
        let state = EditorState {
            doc,
            selection,
            anchors,
            version,
        };
        let patch = Patch {
            changed,
            new_selection: selection,
            version,
            anchors: change,
        };
        (state, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorRange;
    use crate::editing::Cmd;
    use crate::models::Mark;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> AnnotationId {
        AnnotationId::new(s).unwrap()
    }

    fn state(text: &str) -> EditorState {
        EditorState::new(Document::from_text(text), &EngineSettings::default())
    }

    #[test]
    fn selection_normalizes_direction() {
        let selection = Selection::new(8, 3);
        assert_eq!(selection.range(), 3..8);
        assert!(!selection.is_empty());
        assert!(Selection::cursor(4).is_empty());
    }

    #[test]
    fn apply_produces_new_snapshot() {
        let before = state("Hello");
        let (after, patch) = before
            .apply(&Transaction::from(Cmd::InsertText {
                at: 5,
                text: " world".to_string(),
            }))
            .unwrap();

        assert_eq!(before.doc().text(), "Hello");
        assert_eq!(after.doc().text(), "Hello world");
        assert_eq!(after.version(), 1);
        assert_eq!(patch.version, 1);
        assert_eq!(patch.changed, vec![5..11]);
    }

    #[test]
    fn selection_is_mapped_through_the_commit() {
        let before = state("Hello").with_selection(Selection::cursor(5)).unwrap();
        let (after, patch) = before
            .apply(&Transaction::from(Cmd::InsertText {
                at: 0,
                text: ">> ".to_string(),
            }))
            .unwrap();
        assert_eq!(after.selection(), Selection::cursor(8));
        assert_eq!(patch.new_selection, Selection::cursor(8));
    }

    #[test]
    fn explicit_selection_is_validated() {
        let tx = Transaction::from(Cmd::InsertText {
            at: 0,
            text: "x".to_string(),
        })
        .with_selection(Selection::cursor(99));
        assert_eq!(
            state("Hello").apply(&tx).unwrap_err(),
            DocumentError::OutOfRange { pos: 99, size: 6 }
        );
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        assert!(state("Hi").with_selection(Selection::new(0, 3)).is_err());
    }

    #[test]
    fn commit_rebuilds_anchor_state() {
        let before = state("Hello world");
        let (after, patch) = before
            .apply(&Transaction::from(Cmd::AddMark {
                range: 6..11,
                mark: Mark::anchor(id("c1")),
            }))
            .unwrap();

        assert!(before.anchors().index().is_empty());
        assert_eq!(
            AnchorState::get_state(&after).range_for(&id("c1")),
            Some(AnchorRange::new(6, 11))
        );
        assert!(patch.anchors.added.contains(&id("c1")));
        assert_eq!(patch.changed, vec![6..11]);
    }

    #[test]
    fn active_annotation_is_not_a_commit() {
        let before = state("Hello");
        let after = before.with_active_annotation(Some(id("c1")));
        assert_eq!(after.version(), before.version());
        assert_eq!(after.anchors().active(), Some(&id("c1")));
    }
}
