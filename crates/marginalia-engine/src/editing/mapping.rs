use std::fmt;
use std::ops::Range;

use xi_rope::delta::{Builder, DeltaElement, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

/// Position translation through the deltas of one or more committed steps.
#[derive(Clone, Default)]
pub struct Mapping {
    deltas: Vec<Delta<RopeInfo>>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, delta: Delta<RopeInfo>) {
        self.deltas.push(delta);
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// True when no step inserted or removed text.
    pub fn is_identity(&self) -> bool {
        self.deltas.iter().all(|delta| delta.is_identity())
    }

    /// Map a position. With `after`, text inserted exactly at `pos` ends up
    /// before the mapped position.
    pub fn map(&self, pos: usize, after: bool) -> usize {
        self.deltas.iter().fold(pos, |pos, delta| {
            Transformer::new(delta).transform(pos, after)
        })
    }

    /// Map a range so that insertions at either edge stay outside it.
    pub fn map_range(&self, range: Range<usize>) -> Range<usize> {
        let start = self.map(range.start, true);
        let end = self.map(range.end, false);
        start..end.max(start)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("steps", &self.deltas.len())
            .finish()
    }
}

pub(crate) fn insert_delta(base_len: usize, at: usize, text: &str) -> Delta<RopeInfo> {
    replace_delta(base_len, at..at, text)
}

pub(crate) fn delete_delta(base_len: usize, range: Range<usize>) -> Delta<RopeInfo> {
    let mut builder = Builder::new(base_len);
    if !range.is_empty() {
        builder.delete(range);
    }
    builder.build()
}

pub(crate) fn replace_delta(base_len: usize, range: Range<usize>, text: &str) -> Delta<RopeInfo> {
    let mut builder = Builder::new(base_len);
    if text.is_empty() {
        if !range.is_empty() {
            builder.delete(range);
        }
    } else {
        builder.replace(range, Rope::from(text));
    }
    builder.build()
}

pub(crate) fn identity_delta(base_len: usize) -> Delta<RopeInfo> {
    Builder::new(base_len).build()
}

/// Ranges of inserted text, in the coordinates after the delta.
pub(crate) fn inserted_ranges(delta: &Delta<RopeInfo>) -> Vec<Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in delta.els.iter() {
        match op {
            DeltaElement::Copy(from, to) => {
                cursor += to - from;
            }
            DeltaElement::Insert(inserted) => {
                let start = cursor;
                let end = cursor + inserted.len();
                changed.push(start..end);
                cursor = end;
            }
        }
    }
    changed
}
