use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::anchors::{
    AnchorChange, AnchorRange, AnnotationId, DecorationSet, DecorationStyle, RangeIndex,
};
use crate::editing::EditorState;
use crate::models::Document;

/// Anchor state for one editor instance.
///
/// Replaced wholesale on every commit: the index is rescanned from the
/// committed document and the decorations are recompiled from the index.
/// Readers holding an older value keep a consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorState {
    index: Arc<RangeIndex>,
    decorations: DecorationSet,
}

impl AnchorState {
    pub fn new(doc: &Document, style: DecorationStyle) -> Self {
        let index = Arc::new(RangeIndex::build(doc));
        let decorations = DecorationSet::compile(&index, doc, Arc::new(style), None);
        Self { index, decorations }
    }

    /// Derive the state for a newly committed `doc`. The active overlay
    /// carries over.
    pub fn apply(&self, doc: &Document, version: u64) -> (Self, AnchorChange) {
        let index = RangeIndex::rebuild(doc, &self.index);
        let change = AnchorChange::between(&self.index, &index, version);
        let decorations = DecorationSet::compile(
            &index,
            doc,
            self.decorations.style(),
            self.decorations.active_id().cloned(),
        );
        debug!(
            "anchors rebuilt at version {version}: {} ranges, {} added, {} removed, {} moved",
            index.len(),
            change.added.len(),
            change.removed.len(),
            change.moved.len()
        );
        (Self { index, decorations }, change)
    }

    /// The anchor state of a snapshot.
    pub fn get_state(state: &EditorState) -> &AnchorState {
        state.anchors()
    }

    /// Immutable id → range snapshot.
    pub fn ranges(&self) -> Arc<RangeIndex> {
        Arc::clone(&self.index)
    }

    pub fn index(&self) -> &RangeIndex {
        &self.index
    }

    pub fn range_for(&self, id: &AnnotationId) -> Option<AnchorRange> {
        self.index.get(id)
    }

    pub fn hit_test(&self, pos: usize) -> BTreeSet<AnnotationId> {
        self.index.hit_test(pos)
    }

    /// Position a sidebar should scroll the editor to for `id`.
    pub fn scroll_target(&self, id: &AnnotationId) -> Option<usize> {
        self.index.get(id).map(|range| range.from)
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn active(&self) -> Option<&AnnotationId> {
        self.decorations.active_id()
    }

    /// Move the active overlay without touching the index.
    pub fn with_active(&self, id: Option<AnnotationId>) -> Self {
        Self {
            index: Arc::clone(&self.index),
            decorations: self.decorations.set_active(id),
        }
    }
}
