// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use marginalia_engine::{AnnotationId, Block, BlockKind, Document, Mark, TextLeaf};

/// `paragraphs` paragraphs, every `anchor_every`-th carrying one anchor over
/// its middle words.
#[allow(dead_code)]
pub fn generate_annotated_document(paragraphs: usize, anchor_every: usize) -> Document {
    let blocks = (0..paragraphs)
        .map(|ix| {
            let kind = if ix % 10 == 0 {
                BlockKind::Heading { level: 2 }
            } else {
                BlockKind::Paragraph
            };
            let mut leaves = vec![TextLeaf::plain("Some paragraph content with ")];
            if anchor_every > 0 && ix % anchor_every == 0 {
                let id = AnnotationId::new(format!("c{ix}")).unwrap();
                leaves.push(TextLeaf::marked("an annotated phrase", [Mark::anchor(id)]));
            } else {
                leaves.push(TextLeaf::plain("a plain phrase"));
            }
            leaves.push(TextLeaf::marked(" and some bold text.", [Mark::Strong]));
            Block::new(kind, leaves)
        })
        .collect();
    Document::from_blocks(blocks)
}
