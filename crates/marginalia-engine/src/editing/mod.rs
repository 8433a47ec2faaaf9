/*!
 * # Editing Core Module
 *
 * All document mutation funnels through one serialized commit point.
 *
 * ## Architecture Overview
 *
 * ### 1. Commands and Transactions
 * - Every edit is a **`Cmd`** (insert, delete, replace, split, mark, block kind)
 * - A **`Transaction`** batches commands; it commits atomically or not at all
 * - Each command compiles to an **`xi_rope::Delta`** over the flattened text,
 *   so positions can be translated through the commit with a **`Mapping`**
 *
 * ### 2. Immutable Snapshots
 * - **`EditorState`** bundles the document, the selection and the anchor state
 *   derived from that document
 * - `EditorState::apply` never mutates; it returns the next state and a **`Patch`**
 * - Intermediate states inside one transaction are never observable
 *
 * ### 3. Derived Anchor State
 * - After every commit the anchor range index is rescanned from the new
 *   document and the decorations recompiled, synchronously, before the new
 *   state is returned
 * - The incremental alternative (`RangeIndex::map_through`) exists only for
 *   comparison in benchmarks
 *
 * ### 4. The Editor
 * - **`Editor`** owns the current state, the undo **`History`** and the
 *   subscribers
 * - Dispatch, undo and redo each notify every subscriber exactly once with
 *   the commit's `AnchorChange`
 *
 * ## Usage Pattern
 *
 * ```rust
 * use marginalia_engine::editing::{Cmd, Editor, Selection, Transaction};
 * use marginalia_engine::models::Document;
 * use marginalia_engine::settings::EngineSettings;
 *
 * let mut editor = Editor::new(Document::from_text("Read this twice"), &EngineSettings::default());
 *
 * editor.set_selection(Selection::new(5, 9)).unwrap();
 * editor.attach_annotation("c1").unwrap();
 *
 * let patch = editor
 *     .dispatch(&Transaction::from(Cmd::InsertText { at: 0, text: ">> ".to_string() }))
 *     .unwrap();
 * assert!(patch.anchors.moved.iter().any(|id| id.as_str() == "c1"));
 * ```
 */

pub mod commands;
pub mod editor;
pub mod history;
pub mod mapping;
pub mod patch;
pub mod state;

pub use commands::{Cmd, Transaction};
pub use editor::{Editor, EditorError, SubscriptionId};
pub use history::{History, HistoryEntry};
pub use mapping::Mapping;
pub use patch::Patch;
pub use state::{EditorState, Selection};
