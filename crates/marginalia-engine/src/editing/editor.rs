use std::fmt;

use log::{debug, trace};
use thiserror::Error;

use crate::anchors::{AnchorChange, AnchorError, AnnotationId, attach_annotation};
use crate::editing::history::{History, HistoryEntry};
use crate::editing::{EditorState, Patch, Selection, Transaction};
use crate::models::{Document, DocumentError};
use crate::settings::EngineSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Anchor(#[from] AnchorError),
}

/// Handle returned by [`Editor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&AnchorChange)>;

/// The single commit point for one document.
///
/// Every mutation goes through [`Editor::dispatch`], [`Editor::undo`] or
/// [`Editor::redo`]. Each of them replaces the current snapshot with one
/// whose anchor state was rebuilt from the new document, then notifies
/// subscribers exactly once.
pub struct Editor {
    state: EditorState,
    history: History,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Editor {
    pub fn new(doc: Document, settings: &EngineSettings) -> Self {
        Self {
            state: EditorState::new(doc, settings),
            history: History::new(settings.history_depth),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn doc(&self) -> &Document {
        self.state.doc()
    }

    pub fn version(&self) -> u64 {
        self.state.version()
    }

    pub fn dispatch(&mut self, tx: &Transaction) -> Result<Patch, DocumentError> {
        let (next, patch) = self.state.apply(tx)?;
        let previous = self.entry();
        self.history.record(previous);
        self.install(next, &patch);
        Ok(patch)
    }

    /// Restore the previous document. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Patch> {
        let current = self.entry();
        let entry = self.history.undo(current)?;
        let (next, patch) = self.state.replace(entry.doc, entry.selection);
        self.install(next, &patch);
        Some(patch)
    }

    pub fn redo(&mut self) -> Option<Patch> {
        let current = self.entry();
        let entry = self.history.redo(current)?;
        let (next, patch) = self.state.replace(entry.doc, entry.selection);
        self.install(next, &patch);
        Some(patch)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Anchor `id` to the current selection.
    pub fn attach_annotation(&mut self, id: &str) -> Result<Patch, EditorError> {
        let tx = attach_annotation(&self.state, id)?;
        Ok(self.dispatch(&tx)?)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), DocumentError> {
        self.state = self.state.with_selection(selection)?;
        Ok(())
    }

    /// Focus an annotation. Only the decoration overlay changes; nothing is
    /// committed and subscribers are not notified.
    pub fn set_active_annotation(&mut self, id: Option<AnnotationId>) {
        self.state = self.state.with_active_annotation(id);
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&AnchorChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn entry(&self) -> HistoryEntry {
        HistoryEntry {
            doc: self.state.shared_doc(),
            selection: self.state.selection(),
        }
    }

    fn install(&mut self, next: EditorState, patch: &Patch) {
        self.state = next;
        debug!("committed version {}", patch.version);
        for (id, subscriber) in &mut self.subscribers {
            trace!("notifying {id:?} of version {}", patch.version);
            subscriber(&patch.anchors);
        }
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
