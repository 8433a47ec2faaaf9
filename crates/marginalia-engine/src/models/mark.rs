use serde::{Deserialize, Serialize};

use crate::anchors::{AnchorMark, AnnotationId};

/// Inline marks a text leaf can carry.
///
/// Marks are compared by kind *and* payload: two anchor marks with different
/// ids are different marks, so they can cover the same text at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mark {
    Strong,
    Emphasis,
    Code,
    Anchor(AnchorMark),
}

impl Mark {
    pub fn anchor(id: AnnotationId) -> Self {
        Mark::Anchor(AnchorMark::new(id))
    }

    /// Capability check: is this an anchor-kind mark?
    pub fn as_anchor(&self) -> Option<&AnchorMark> {
        match self {
            Mark::Anchor(anchor) => Some(anchor),
            _ => None,
        }
    }

    /// The annotation id, for anchor marks that have one.
    pub fn anchor_id(&self) -> Option<&AnnotationId> {
        self.as_anchor().and_then(AnchorMark::id)
    }

    /// Whether text typed right after a span with this mark picks it up.
    ///
    /// Anchors are not inclusive: typing at the end of a commented span does
    /// not grow the comment.
    pub fn is_inclusive(&self) -> bool {
        !matches!(self, Mark::Anchor(_))
    }
}

/// Insert `mark` into a sorted, deduplicated mark set.
pub(crate) fn add_mark(marks: &mut Vec<Mark>, mark: &Mark) {
    if let Err(ix) = marks.binary_search(mark) {
        marks.insert(ix, mark.clone());
    }
}

pub(crate) fn remove_mark(marks: &mut Vec<Mark>, mark: &Mark) {
    marks.retain(|m| m != mark);
}

/// Sort and deduplicate an arbitrary list of marks.
pub(crate) fn normalize_marks(marks: &mut Vec<Mark>) {
    marks.sort();
    marks.dedup();
}
