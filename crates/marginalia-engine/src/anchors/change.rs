use std::collections::BTreeSet;

use crate::anchors::{AnnotationId, RangeIndex};

/// Notification payload sent to subscribers after each commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorChange {
    /// Version of the state the change was committed as.
    pub version: u64,
    pub added: BTreeSet<AnnotationId>,
    /// Ids indexed before the commit but not after. Their annotation content
    /// no longer has an anchor in the document.
    pub removed: BTreeSet<AnnotationId>,
    /// Ids present on both sides whose range changed.
    pub moved: BTreeSet<AnnotationId>,
}

impl AnchorChange {
    pub fn between(previous: &RangeIndex, next: &RangeIndex, version: u64) -> Self {
        let mut change = AnchorChange {
            version,
            ..Default::default()
        };
        for (id, range) in next.iter() {
            match previous.get(id) {
                None => {
                    change.added.insert(id.clone());
                }
                Some(before) if before != *range => {
                    change.moved.insert(id.clone());
                }
                Some(_) => {}
            }
        }
        change.removed = previous
            .ids()
            .filter(|id| !next.contains(id))
            .cloned()
            .collect();
        change
    }

    pub fn orphaned(&self) -> &BTreeSet<AnnotationId> {
        &self.removed
    }

    /// No id was added, removed or moved.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }
}
