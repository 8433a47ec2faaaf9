pub mod anchors;
pub mod editing;
pub mod io;
pub mod models;
pub mod settings;

// Re-export key types for easier usage
pub use anchors::{
    AnchorChange, AnchorError, AnchorMark, AnchorRange, AnchorState, AnnotationId, Decoration,
    DecorationSet, RangeIndex, attach_annotation,
};
pub use editing::{Cmd, Editor, EditorError, EditorState, Patch, Selection, Transaction};
pub use io::SerializeError;
pub use models::{Block, BlockKind, Document, DocumentError, Mark, TextLeaf};
pub use settings::EngineSettings;
