//! Host document model: an ordered list of blocks, each an ordered list of
//! marked text leaves.
//!
//! ## Position space
//!
//! Positions are UTF-8 byte offsets into the flattened text, where blocks
//! are joined by a single separator position:
//!
//! ```text
//! "Hello" | "World"
//!  0    5   6    11      size = 11
//! ```
//!
//! Position 5 is the end of the first block, position 6 the start of the
//! second. Every position in `0..=size` resolves to exactly one block.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::mark::{Mark, add_mark, normalize_marks, remove_mark};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("position {pos} is outside the document (size {size})")]
    OutOfRange { pos: usize, size: usize },
    #[error("position {pos} is not on a character boundary")]
    NotCharBoundary { pos: usize },
    #[error("range {from}..{to} is inverted")]
    InvertedRange { from: usize, to: usize },
    #[error("heading level {0} is outside 1..=6")]
    InvalidHeadingLevel(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    Quote,
    CodeBlock,
}

impl BlockKind {
    pub fn heading(level: u8) -> Result<Self, DocumentError> {
        if (1..=6).contains(&level) {
            Ok(BlockKind::Heading { level })
        } else {
            Err(DocumentError::InvalidHeadingLevel(level))
        }
    }
}

/// A run of text with one uniform set of marks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextLeaf {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl TextLeaf {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        let mut marks: Vec<Mark> = marks.into_iter().collect();
        normalize_marks(&mut marks);
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    kind: BlockKind,
    leaves: Vec<TextLeaf>,
}

impl Block {
    pub fn new(kind: BlockKind, leaves: Vec<TextLeaf>) -> Self {
        let mut block = Self { kind, leaves };
        block.normalize();
        block
    }

    pub fn paragraph(leaves: Vec<TextLeaf>) -> Self {
        Self::new(BlockKind::Paragraph, leaves)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn leaves(&self) -> &[TextLeaf] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.iter().map(TextLeaf::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn text(&self) -> String {
        self.leaves.iter().map(|leaf| leaf.text.as_str()).collect()
    }

    /// Drop empty leaves and merge neighbours that carry identical marks.
    fn normalize(&mut self) {
        let mut merged: Vec<TextLeaf> = Vec::with_capacity(self.leaves.len());
        for mut leaf in self.leaves.drain(..) {
            if leaf.text.is_empty() {
                continue;
            }
            normalize_marks(&mut leaf.marks);
            match merged.last_mut() {
                Some(prev) if prev.marks == leaf.marks => prev.text.push_str(&leaf.text),
                _ => merged.push(leaf),
            }
        }
        self.leaves = merged;
    }

    /// Split the leaves at a block-local offset. The offset must be on a char
    /// boundary.
    fn split_leaves(leaves: Vec<TextLeaf>, offset: usize) -> (Vec<TextLeaf>, Vec<TextLeaf>) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut pos = 0;
        for leaf in leaves {
            let end = pos + leaf.len();
            if end <= offset {
                before.push(leaf);
            } else if pos >= offset {
                after.push(leaf);
            } else {
                let cut = offset - pos;
                before.push(TextLeaf {
                    text: leaf.text[..cut].to_string(),
                    marks: leaf.marks.clone(),
                });
                after.push(TextLeaf {
                    text: leaf.text[cut..].to_string(),
                    marks: leaf.marks,
                });
            }
            pos = end;
        }
        (before, after)
    }

    fn insert_leaves(&mut self, offset: usize, leaves: Vec<TextLeaf>) {
        let (mut before, after) = Self::split_leaves(std::mem::take(&mut self.leaves), offset);
        before.extend(leaves);
        before.extend(after);
        self.leaves = before;
        self.normalize();
    }

    fn delete(&mut self, from: usize, to: usize) {
        let (before, rest) = Self::split_leaves(std::mem::take(&mut self.leaves), from);
        let (_, after) = Self::split_leaves(rest, to - from);
        self.leaves = before;
        self.leaves.extend(after);
        self.normalize();
    }

    fn update_marks(&mut self, from: usize, to: usize, f: impl Fn(&mut Vec<Mark>)) {
        let (before, rest) = Self::split_leaves(std::mem::take(&mut self.leaves), from);
        let (mut middle, after) = Self::split_leaves(rest, to - from);
        for leaf in &mut middle {
            f(&mut leaf.marks);
        }
        self.leaves = before;
        self.leaves.extend(middle);
        self.leaves.extend(after);
        self.normalize();
    }

    fn is_char_boundary(&self, offset: usize) -> bool {
        let mut pos = 0;
        for leaf in &self.leaves {
            let end = pos + leaf.len();
            if offset <= end {
                return leaf.text.is_char_boundary(offset - pos);
            }
            pos = end;
        }
        offset == pos
    }
}

/// A text leaf with its absolute position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedLeaf<'a> {
    pub block: usize,
    pub from: usize,
    pub to: usize,
    pub leaf: &'a TextLeaf,
}

/// Iterator over every text leaf in document order.
pub struct Leaves<'a> {
    blocks: &'a [Block],
    block: usize,
    leaf: usize,
    pos: usize,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = PositionedLeaf<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let block = self.blocks.get(self.block)?;
            if let Some(leaf) = block.leaves.get(self.leaf) {
                let from = self.pos;
                self.pos += leaf.len();
                self.leaf += 1;
                return Some(PositionedLeaf {
                    block: self.block,
                    from,
                    to: self.pos,
                    leaf,
                });
            }
            self.block += 1;
            self.leaf = 0;
            if self.block < self.blocks.len() {
                // block separator
                self.pos += 1;
            }
        }
    }
}

/// The rich-text document. Never has zero blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::paragraph(Vec::new())],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self { blocks }
    }

    /// One paragraph per line of plain text.
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(
            text.split('\n')
                .map(|line| Block::paragraph(vec![TextLeaf::plain(line)]))
                .collect(),
        )
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Total size of the position space.
    pub fn size(&self) -> usize {
        self.blocks.iter().map(Block::len).sum::<usize>() + self.blocks.len() - 1
    }

    /// Flattened text, blocks joined by `\n`. Byte offsets into this string
    /// are document positions.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text between two positions, block separators rendered as `\n`.
    pub fn text_between(&self, range: Range<usize>) -> String {
        let text = self.text();
        let end = range.end.min(text.len());
        let start = range.start.min(end);
        text.get(start..end).unwrap_or_default().to_string()
    }

    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            blocks: &self.blocks,
            block: 0,
            leaf: 0,
            pos: 0,
        }
    }

    /// Start position of every block.
    fn block_starts(&self) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.blocks.len());
        let mut pos = 0;
        for block in &self.blocks {
            starts.push(pos);
            pos += block.len() + 1;
        }
        starts
    }

    /// Resolve a position to `(block index, block-local offset)`.
    pub fn resolve(&self, pos: usize) -> Result<(usize, usize), DocumentError> {
        let size = self.size();
        if pos > size {
            return Err(DocumentError::OutOfRange { pos, size });
        }
        let mut start = 0;
        for (ix, block) in self.blocks.iter().enumerate() {
            let end = start + block.len();
            if pos <= end {
                let offset = pos - start;
                if !block.is_char_boundary(offset) {
                    return Err(DocumentError::NotCharBoundary { pos });
                }
                return Ok((ix, offset));
            }
            start = end + 1;
        }
        Err(DocumentError::OutOfRange { pos, size })
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), DocumentError> {
        if range.start > range.end {
            return Err(DocumentError::InvertedRange {
                from: range.start,
                to: range.end,
            });
        }
        Ok(())
    }

    /// Marks that text inserted at `at` picks up.
    ///
    /// Inside a leaf that is every mark of the leaf. At a leaf edge it is the
    /// inclusive marks of the leaf before it in the same block, plus any mark
    /// the text on both sides carries. A non-inclusive mark therefore grows
    /// when typing inside its span and stays put when typing at its edge.
    fn marks_at(&self, at: usize, block: usize) -> Vec<Mark> {
        let mut before: Option<PositionedLeaf<'_>> = None;
        let mut after: Option<PositionedLeaf<'_>> = None;
        for positioned in self.leaves() {
            if positioned.from < at && at < positioned.to {
                return positioned.leaf.marks.clone();
            }
            if positioned.to <= at {
                before = Some(positioned);
            } else {
                after = Some(positioned);
                break;
            }
        }
        let Some(before) = before else {
            return Vec::new();
        };
        let continues = |mark: &Mark| after.is_some_and(|next| next.leaf.marks.contains(mark));
        before
            .leaf
            .marks
            .iter()
            .filter(|mark| (before.block == block && mark.is_inclusive()) || continues(*mark))
            .cloned()
            .collect()
    }

    pub(crate) fn insert_text(&mut self, at: usize, text: &str) -> Result<(), DocumentError> {
        let (ix, _) = self.resolve(at)?;
        if text.is_empty() {
            return Ok(());
        }
        let marks = self.marks_at(at, ix);
        self.insert_lines(at, vec![TextLeaf::marked(text, marks)])
    }

    /// Rich insert. The leaves keep their own marks and also pick up the
    /// anchors that enclose `at`, so pasting inside a comment stays inside it.
    pub(crate) fn insert_leaves(
        &mut self,
        at: usize,
        leaves: Vec<TextLeaf>,
    ) -> Result<(), DocumentError> {
        let (ix, _) = self.resolve(at)?;
        let enclosing: Vec<Mark> = self
            .marks_at(at, ix)
            .into_iter()
            .filter(|mark| !mark.is_inclusive())
            .collect();
        let leaves = leaves
            .into_iter()
            .map(|mut leaf| {
                normalize_marks(&mut leaf.marks);
                for mark in &enclosing {
                    add_mark(&mut leaf.marks, mark);
                }
                leaf
            })
            .collect();
        self.insert_lines(at, leaves)
    }

    /// Insert leaves in order, turning every `'\n'` into a block split.
    fn insert_lines(&mut self, mut at: usize, leaves: Vec<TextLeaf>) -> Result<(), DocumentError> {
        for leaf in leaves {
            for (n, line) in leaf.text.split('\n').enumerate() {
                if n > 0 {
                    self.split_block(at)?;
                    at += 1;
                }
                if line.is_empty() {
                    continue;
                }
                let (ix, offset) = self.resolve(at)?;
                self.blocks[ix].insert_leaves(
                    offset,
                    vec![TextLeaf {
                        text: line.to_string(),
                        marks: leaf.marks.clone(),
                    }],
                );
                at += line.len();
            }
        }
        Ok(())
    }

    pub(crate) fn delete(&mut self, range: Range<usize>) -> Result<(), DocumentError> {
        self.check_range(&range)?;
        let (from_ix, from_off) = self.resolve(range.start)?;
        let (to_ix, to_off) = self.resolve(range.end)?;
        if from_ix == to_ix {
            self.blocks[from_ix].delete(from_off, to_off);
            return Ok(());
        }
        // Join the head of the first block with the tail of the last one.
        let last = std::mem::replace(&mut self.blocks[to_ix], Block::paragraph(Vec::new()));
        let (_, tail) = Block::split_leaves(last.leaves, to_off);
        let first = &mut self.blocks[from_ix];
        let (head, _) = Block::split_leaves(std::mem::take(&mut first.leaves), from_off);
        first.leaves = head;
        first.leaves.extend(tail);
        first.normalize();
        self.blocks.drain(from_ix + 1..=to_ix);
        Ok(())
    }

    pub(crate) fn split_block(&mut self, at: usize) -> Result<(), DocumentError> {
        let (ix, offset) = self.resolve(at)?;
        let block = &mut self.blocks[ix];
        let (head, tail) = Block::split_leaves(std::mem::take(&mut block.leaves), offset);
        block.leaves = head;
        let kind = match block.kind {
            BlockKind::Heading { .. } if tail.is_empty() => BlockKind::Paragraph,
            kind => kind,
        };
        self.blocks.insert(ix + 1, Block::new(kind, tail));
        Ok(())
    }

    pub(crate) fn add_mark(&mut self, range: Range<usize>, mark: &Mark) -> Result<(), DocumentError> {
        self.update_marks(range, |marks| add_mark(marks, mark))
    }

    pub(crate) fn remove_mark(
        &mut self,
        range: Range<usize>,
        mark: &Mark,
    ) -> Result<(), DocumentError> {
        self.update_marks(range, |marks| remove_mark(marks, mark))
    }

    /// Apply `f` to the marks of every leaf in `range`. Marks are applied per
    /// block, so a mark never spans a block boundary.
    fn update_marks(
        &mut self,
        range: Range<usize>,
        f: impl Fn(&mut Vec<Mark>),
    ) -> Result<(), DocumentError> {
        self.check_range(&range)?;
        let (from_ix, _) = self.resolve(range.start)?;
        let (to_ix, _) = self.resolve(range.end)?;
        let starts = self.block_starts();
        for ix in from_ix..=to_ix {
            let block = &mut self.blocks[ix];
            let block_start = starts[ix];
            let block_end = block_start + block.len();
            let from = range.start.max(block_start) - block_start;
            let to = range.end.min(block_end) - block_start;
            if from < to {
                block.update_marks(from, to, &f);
            }
        }
        Ok(())
    }

    pub(crate) fn set_block_kind(&mut self, at: usize, kind: BlockKind) -> Result<(), DocumentError> {
        if let BlockKind::Heading { level } = kind {
            BlockKind::heading(level)?;
        }
        let (ix, _) = self.resolve(at)?;
        self.blocks[ix].kind = kind;
        Ok(())
    }
}
