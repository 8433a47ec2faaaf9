use crate::anchors::{AnchorError, AnnotationId};
use crate::editing::{Cmd, EditorState, Transaction};
use crate::models::Mark;

/// Build the transaction that anchors `id` to the current selection.
pub fn attach_annotation(state: &EditorState, id: &str) -> Result<Transaction, AnchorError> {
    let id = AnnotationId::new(id)?;
    attach_annotation_id(state, id)
}

pub fn attach_annotation_id(
    state: &EditorState,
    id: AnnotationId,
) -> Result<Transaction, AnchorError> {
    let selection = state.selection();
    if selection.is_empty() {
        return Err(AnchorError::EmptySelection);
    }
    Ok(Transaction::from(Cmd::AddMark {
        range: selection.range(),
        mark: Mark::anchor(id),
    }))
}
