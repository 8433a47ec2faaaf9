use std::ops::Range;

use xi_rope::{Delta, RopeInfo};

use crate::editing::mapping::{
    delete_delta, identity_delta, insert_delta, inserted_ranges, replace_delta,
};
use crate::editing::{Mapping, Selection};
use crate::models::{BlockKind, Document, DocumentError, Mark, TextLeaf};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    /// Rich paste: leaves keep their own marks, anchors included.
    InsertLeaves {
        at: usize,
        leaves: Vec<TextLeaf>,
    },
    DeleteRange {
        range: Range<usize>,
    },
    ReplaceRange {
        range: Range<usize>,
        text: String,
    },
    SplitBlock {
        at: usize,
    },
    AddMark {
        range: Range<usize>,
        mark: Mark,
    },
    RemoveMark {
        range: Range<usize>,
        mark: Mark,
    },
    SetBlockKind {
        at: usize,
        kind: BlockKind,
    },
}

/// An ordered batch of commands committed as one mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    cmds: Vec<Cmd>,
    selection: Option<Selection>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, cmd: Cmd) -> Self {
        self.cmds.push(cmd);
        self
    }

    pub fn push(&mut self, cmd: Cmd) {
        self.cmds.push(cmd);
    }

    /// Selection to install after the commit instead of the mapped one.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn cmds(&self) -> &[Cmd] {
        &self.cmds
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

impl From<Cmd> for Transaction {
    fn from(cmd: Cmd) -> Self {
        Transaction::new().with(cmd)
    }
}

/// Outcome of running a transaction against a document.
#[derive(Debug)]
pub struct Applied {
    pub doc: Document,
    pub mapping: Mapping,
    pub changed: Vec<Range<usize>>,
}

/// Run every command of `tx` against a copy of `doc`. The first failing
/// command aborts the whole transaction.
pub fn apply_transaction(doc: &Document, tx: &Transaction) -> Result<Applied, DocumentError> {
    let mut doc = doc.clone();
    let mut mapping = Mapping::new();
    let mut changed: Vec<Range<usize>> = Vec::new();

    for cmd in tx.cmds() {
        let delta = apply_cmd(&mut doc, cmd)?;

        let mut step = Mapping::new();
        step.push(delta.clone());
        for range in &mut changed {
            *range = step.map(range.start, false)..step.map(range.end, true);
        }
        changed.extend(inserted_ranges(&delta));
        if let Cmd::AddMark { range, .. } | Cmd::RemoveMark { range, .. } = cmd {
            if !range.is_empty() {
                changed.push(range.clone());
            }
        }

        mapping.push(delta);
    }

    Ok(Applied {
        doc,
        mapping,
        changed,
    })
}

/// Apply one command in place and compile it to a delta over the
/// flattened text. Mark and block-kind changes compile to the identity.
pub(crate) fn apply_cmd(doc: &mut Document, cmd: &Cmd) -> Result<Delta<RopeInfo>, DocumentError> {
    let size = doc.size();
    let delta = match cmd {
        Cmd::InsertText { at, text } => {
            doc.insert_text(*at, text)?;
            insert_delta(size, *at, text)
        }
        Cmd::InsertLeaves { at, leaves } => {
            let text: String = leaves.iter().map(|leaf| leaf.text.as_str()).collect();
            doc.insert_leaves(*at, leaves.clone())?;
            insert_delta(size, *at, &text)
        }
        Cmd::DeleteRange { range } => {
            doc.delete(range.clone())?;
            delete_delta(size, range.clone())
        }
        Cmd::ReplaceRange { range, text } => {
            doc.delete(range.clone())?;
            doc.insert_text(range.start, text)?;
            replace_delta(size, range.clone(), text)
        }
        Cmd::SplitBlock { at } => {
            doc.split_block(*at)?;
            insert_delta(size, *at, "\n")
        }
        Cmd::AddMark { range, mark } => {
            doc.add_mark(range.clone(), mark)?;
            identity_delta(size)
        }
        Cmd::RemoveMark { range, mark } => {
            doc.remove_mark(range.clone(), mark)?;
            identity_delta(size)
        }
        Cmd::SetBlockKind { at, kind } => {
            doc.set_block_kind(*at, *kind)?;
            identity_delta(size)
        }
    };
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnnotationId;
    use pretty_assertions::assert_eq;

    fn anchor(id: &str) -> Mark {
        Mark::anchor(AnnotationId::new(id).unwrap())
    }

    #[test]
    fn delta_size_tracks_document_size() {
        let mut doc = Document::from_text("Hello\nWorld");
        for cmd in [
            Cmd::InsertText {
                at: 2,
                text: "yy".to_string(),
            },
            Cmd::SplitBlock { at: 4 },
            Cmd::InsertText {
                at: 1,
                text: "p\nq".to_string(),
            },
            Cmd::DeleteRange { range: 1..9 },
            Cmd::ReplaceRange {
                range: 0..2,
                text: "abc".to_string(),
            },
        ] {
            let before = doc.size();
            let delta = apply_cmd(&mut doc, &cmd).unwrap();
            assert_eq!(delta.base_len, before);
            assert_eq!(delta.new_document_len(), doc.size(), "{cmd:?}");
        }
    }

    #[test]
    fn mark_commands_compile_to_identity() {
        let mut doc = Document::from_text("Hello");
        let delta = apply_cmd(
            &mut doc,
            &Cmd::AddMark {
                range: 0..3,
                mark: anchor("c1"),
            },
        )
        .unwrap();
        assert!(delta.is_identity());
    }

    #[test]
    fn failing_command_rejects_the_whole_transaction() {
        let doc = Document::from_text("Hello");
        let tx = Transaction::new()
            .with(Cmd::InsertText {
                at: 0,
                text: "ok".to_string(),
            })
            .with(Cmd::DeleteRange { range: 3..40 });

        let err = apply_transaction(&doc, &tx).err();
        assert_eq!(err, Some(DocumentError::OutOfRange { pos: 40, size: 7 }));
        assert_eq!(doc.text(), "Hello");
    }

    #[test]
    fn changed_ranges_follow_later_commands() {
        let doc = Document::from_text("Hello");
        let tx = Transaction::new()
            .with(Cmd::InsertText {
                at: 5,
                text: "!".to_string(),
            })
            .with(Cmd::InsertText {
                at: 0,
                text: ">> ".to_string(),
            });
        let applied = apply_transaction(&doc, &tx).unwrap();
        assert_eq!(applied.doc.text(), ">> Hello!");
        assert_eq!(applied.changed, vec![8..9, 0..3]);
        assert_eq!(applied.mapping.map(5, false), 8);
    }

    #[test]
    fn replace_inherits_marks_inside_a_span() {
        let mut doc = Document::from_text("abcdef");
        apply_cmd(
            &mut doc,
            &Cmd::AddMark {
                range: 0..6,
                mark: Mark::Strong,
            },
        )
        .unwrap();
        apply_cmd(
            &mut doc,
            &Cmd::ReplaceRange {
                range: 2..4,
                text: "XY".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            doc.blocks()[0].leaves(),
            &[TextLeaf::marked("abXYef", [Mark::Strong])]
        );
    }
}
