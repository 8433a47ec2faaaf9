use crate::anchors::AnchorChange;
use crate::editing::Selection;

/// Result of committing a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ranges touched by the commit, in post-commit positions
    pub changed: Vec<std::ops::Range<usize>>,
    pub new_selection: Selection,
    pub version: u64,
    /// How the anchor index moved relative to the previous version
    pub anchors: AnchorChange,
}
