//! # Range Index
//!
//! The derived mapping from annotation id to the single contiguous span of
//! text its anchor mark covers.
//!
//! ## Build
//!
//! The index is rebuilt from scratch on every commit by one walk over the
//! document's leaves in order:
//!
//! 1. Track the absolute position of each leaf and how many bytes of text
//!    were seen before it.
//! 2. For every anchor id on the leaf, extend that id's current fragment if
//!    no text lies between the fragment and the leaf. Block separators alone
//!    do not break a fragment, so an anchor crossing a paragraph boundary is
//!    still one range.
//! 3. On a gap, the id keeps only the larger of its best fragment so far and
//!    the one just closed. Equal sizes keep the earlier fragment.
//! 4. Empty or out-of-bounds results are dropped.
//!
//! An id therefore maps to at most one range. When the same id is applied to
//! disjoint spans the smaller spans are not indexed at all, which is visible
//! to hit-testing and to orphan detection.
//!
//! ## Incremental mapping
//!
//! [`RangeIndex::map_through`] maps a previous index through a commit's
//! [`Mapping`] instead of rescanning. It is correct only when the commit did
//! not add or remove anchor marks, and the commit pipeline does not use it.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use std::sync::Arc;

use log::{debug, warn};

use crate::anchors::AnnotationId;
use crate::editing::Mapping;
use crate::models::Document;

/// A half-open span of document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorRange {
    pub from: usize,
    pub to: usize,
}

impl AnchorRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.from <= pos && pos < self.to
    }

    /// `0 <= from < to <= size`
    pub fn is_valid(&self, size: usize) -> bool {
        self.from < self.to && self.to <= size
    }

    pub fn as_range(&self) -> Range<usize> {
        self.from..self.to
    }
}

impl From<Range<usize>> for AnchorRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Immutable id → range snapshot for one document version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeIndex {
    ranges: BTreeMap<AnnotationId, AnchorRange>,
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
    range: AnchorRange,
    // Offsets into the text with block separators removed.
    text_start: usize,
    text_end: usize,
}

#[derive(Debug)]
struct Accumulator {
    best: Option<Fragment>,
    current: Fragment,
}

fn larger(best: Option<Fragment>, candidate: Fragment) -> Fragment {
    match best {
        Some(best) if best.range.len() >= candidate.range.len() => best,
        _ => candidate,
    }
}

impl RangeIndex {
    /// Full rescan of `doc`. Never fails.
    pub fn build(doc: &Document) -> Self {
        let mut accumulators: BTreeMap<&AnnotationId, Accumulator> = BTreeMap::new();
        let mut text_seen = 0;

        for positioned in doc.leaves() {
            let fragment = Fragment {
                range: AnchorRange::new(positioned.from, positioned.to),
                text_start: text_seen,
                text_end: text_seen + positioned.leaf.len(),
            };
            text_seen = fragment.text_end;

            for id in positioned.leaf.marks.iter().filter_map(|m| m.anchor_id()) {
                match accumulators.get_mut(id) {
                    None => {
                        accumulators.insert(
                            id,
                            Accumulator {
                                best: None,
                                current: fragment,
                            },
                        );
                    }
                    Some(acc) if acc.current.text_end == fragment.text_start => {
                        acc.current.range.to = fragment.range.to;
                        acc.current.text_end = fragment.text_end;
                    }
                    Some(acc) => {
                        debug!(
                            "anchor {id}: fragment {:?} is disjoint from {:?}, keeping the larger",
                            fragment.range, acc.current.range
                        );
                        acc.best = Some(larger(acc.best, acc.current));
                        acc.current = fragment;
                    }
                }
            }
        }

        let size = doc.size();
        let mut ranges = BTreeMap::new();
        for (id, acc) in accumulators {
            let range = larger(acc.best, acc.current).range;
            if range.is_valid(size) {
                ranges.insert(id.clone(), range);
            } else {
                warn!("dropping invalid range {range:?} for anchor {id} (size {size})");
            }
        }
        Self { ranges }
    }

    /// Rescan, reusing `previous` when nothing changed.
    pub fn rebuild(doc: &Document, previous: &Arc<RangeIndex>) -> Arc<RangeIndex> {
        let next = Self::build(doc);
        if next == **previous {
            Arc::clone(previous)
        } else {
            Arc::new(next)
        }
    }

    /// Map every range through `mapping`, dropping those that collapse or
    /// fall outside `size`.
    pub fn map_through(&self, mapping: &Mapping, size: usize) -> Self {
        let ranges = self
            .ranges
            .iter()
            .filter_map(|(id, range)| {
                let mapped = AnchorRange::from(mapping.map_range(range.as_range()));
                mapped.is_valid(size).then(|| (id.clone(), mapped))
            })
            .collect();
        Self { ranges }
    }

    pub fn get(&self, id: &AnnotationId) -> Option<AnchorRange> {
        self.ranges.get(id).copied()
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.ranges.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnnotationId, &AnchorRange)> {
        self.ranges.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AnnotationId> {
        self.ranges.keys()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Every id whose range contains `pos`.
    pub fn hit_test(&self, pos: usize) -> BTreeSet<AnnotationId> {
        self.ranges
            .iter()
            .filter(|(_, range)| range.contains(pos))
            .map(|(id, _)| id.clone())
            .collect()
    }
}
