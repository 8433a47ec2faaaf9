//! HTML-subset markup form of a document.
//!
//! Anchors are written as `<span data-anchor-id="c1">`, the attribute name
//! coming from [`EngineSettings::id_attribute`](crate::settings::EngineSettings).
//! The id is the only thing the element carries.

use marginalia_markup::{Event, MarkupWriter, Tag};

use crate::anchors::AnchorMark;
use crate::models::{Block, BlockKind, Document, Mark, TextLeaf};

pub fn to_markup(doc: &Document, id_attribute: &str) -> String {
    let mut writer = MarkupWriter::new();
    for block in doc.blocks() {
        let tag = block_tag(block.kind());
        writer.open(tag, &[]);
        for leaf in block.leaves() {
            write_leaf(&mut writer, leaf, id_attribute);
        }
        writer.close(tag);
    }
    writer.finish()
}

fn write_leaf(writer: &mut MarkupWriter, leaf: &TextLeaf, id_attribute: &str) {
    for mark in &leaf.marks {
        match mark {
            Mark::Anchor(anchor) => match anchor.id() {
                Some(id) => writer.open(Tag::Span, &[(id_attribute, id.as_str())]),
                None => writer.open(Tag::Span, &[]),
            },
            other => writer.open(mark_tag(other), &[]),
        }
    }
    writer.text(&leaf.text);
    for mark in leaf.marks.iter().rev() {
        writer.close(mark_tag(mark));
    }
}

fn block_tag(kind: BlockKind) -> Tag {
    match kind {
        BlockKind::Paragraph => Tag::Paragraph,
        BlockKind::Heading { level } => Tag::Heading(level),
        BlockKind::Quote => Tag::Quote,
        BlockKind::CodeBlock => Tag::CodeBlock,
    }
}

fn mark_tag(mark: &Mark) -> Tag {
    match mark {
        Mark::Strong => Tag::Strong,
        Mark::Emphasis => Tag::Emphasis,
        Mark::Code => Tag::Code,
        Mark::Anchor(_) => Tag::Span,
    }
}

/// Parse markup leniently. Never fails: unknown elements are ignored, text
/// outside any block lands in a paragraph, unclosed inline elements end with
/// their block, and a `<span>` without a usable id becomes an inert anchor.
pub fn from_markup(input: &str, id_attribute: &str) -> Document {
    let mut builder = DocumentBuilder::default();

    for event in marginalia_markup::parse(input) {
        match event {
            Event::Start { tag, .. } if tag.is_block() => {
                builder.finish_block();
                builder.current = Some((block_kind(tag), Vec::new()));
            }
            Event::End { tag } if tag.is_block() => builder.finish_block(),
            Event::Start { tag, attrs } => {
                let mark = match tag {
                    Tag::Strong => Mark::Strong,
                    Tag::Emphasis => Mark::Emphasis,
                    Tag::Code => Mark::Code,
                    _ => Mark::Anchor(AnchorMark::from_attribute(attrs.get(id_attribute))),
                };
                builder.marks.push((tag, mark));
            }
            Event::End { tag } => {
                if let Some(ix) = builder.marks.iter().rposition(|(open, _)| *open == tag) {
                    builder.marks.truncate(ix);
                }
            }
            Event::Text(text) => builder.text(text),
        }
    }

    builder.finish()
}

fn block_kind(tag: Tag) -> BlockKind {
    match tag {
        Tag::Heading(level) => BlockKind::Heading {
            level: level.clamp(1, 6),
        },
        Tag::Quote => BlockKind::Quote,
        Tag::CodeBlock => BlockKind::CodeBlock,
        _ => BlockKind::Paragraph,
    }
}

#[derive(Default)]
struct DocumentBuilder {
    blocks: Vec<Block>,
    current: Option<(BlockKind, Vec<TextLeaf>)>,
    marks: Vec<(Tag, Mark)>,
}

impl DocumentBuilder {
    fn text(&mut self, text: String) {
        if self.current.is_none() {
            if text.trim().is_empty() {
                return;
            }
            self.current = Some((BlockKind::Paragraph, Vec::new()));
        }
        let marks = self.marks.iter().map(|(_, mark)| mark.clone());
        let leaf = TextLeaf::marked(text, marks);
        if let Some((_, leaves)) = &mut self.current {
            leaves.push(leaf);
        }
    }

    fn finish_block(&mut self) {
        self.marks.clear();
        if let Some((kind, leaves)) = self.current.take() {
            self.blocks.push(Block::new(kind, leaves));
        }
    }

    fn finish(mut self) -> Document {
        self.finish_block();
        Document::from_blocks(self.blocks)
    }
}
