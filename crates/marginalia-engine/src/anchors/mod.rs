//! # Annotation anchors
//!
//! Anchors tie external annotation content (comments, review notes) to a
//! span of document text through an inline mark that carries nothing but an
//! opaque [`AnnotationId`]. Everything else is derived:
//!
//! - **`id`**: the id type and the [`AnchorMark`] itself
//! - **`index`**: the [`RangeIndex`] rebuilt from the document on every commit
//! - **`decorations`**: highlight intervals compiled from the index, plus the
//!   active overlay
//! - **`state`**: [`AnchorState`], the per-editor bundle of index and
//!   decorations, and the read-only query surface
//! - **`change`**: [`AnchorChange`], the per-commit diff sent to subscribers
//! - **`command`**: [`attach_annotation`], the only anchor-specific edit
//!
//! Anchors are removed by ordinary text deletion or by unsetting the mark;
//! the next rebuild picks that up.

pub mod change;
pub mod command;
pub mod decorations;
pub mod id;
pub mod index;
pub mod state;

pub use change::AnchorChange;
pub use command::{attach_annotation, attach_annotation_id};
pub use decorations::{Decoration, DecorationSet, DecorationStyle};
pub use id::{AnchorError, AnchorMark, AnnotationId};
pub use index::{AnchorRange, RangeIndex};
pub use state::AnchorState;
