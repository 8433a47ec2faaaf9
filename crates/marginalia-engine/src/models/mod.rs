pub mod document;
pub mod mark;

pub use document::{Block, BlockKind, Document, DocumentError, Leaves, PositionedLeaf, TextLeaf};
pub use mark::Mark;
