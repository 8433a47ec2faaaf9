//! End-to-end anchor behaviour through the editor's commit pipeline.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use marginalia_engine::{
    AnchorChange, AnchorRange, AnnotationId, Block, Cmd, Document, Editor, EngineSettings, Mark,
    Selection, TextLeaf, Transaction,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

const TEXT: &str = "0123456789abcdefghijABCDEFGHIJ";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> AnnotationId {
    AnnotationId::new(s).unwrap()
}

#[fixture]
fn editor() -> Editor {
    init_logging();
    Editor::new(Document::from_text(TEXT), &EngineSettings::default())
}

fn mark(editor: &mut Editor, name: &str, from: usize, to: usize) {
    editor
        .dispatch(&Transaction::from(Cmd::AddMark {
            range: from..to,
            mark: Mark::anchor(id(name)),
        }))
        .unwrap();
}

fn range_of(editor: &Editor, name: &str) -> Option<AnchorRange> {
    editor.state().anchors().range_for(&id(name))
}

#[rstest]
fn insertion_before_a_range_shifts_it(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 14);

    editor
        .dispatch(&Transaction::from(Cmd::InsertText {
            at: 0,
            text: "xyz".to_string(),
        }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(13, 17)));
}

#[rstest]
fn deleting_all_marked_text_removes_the_id(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 14);

    let patch = editor
        .dispatch(&Transaction::from(Cmd::DeleteRange { range: 10..14 }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), None);
    assert_eq!(patch.anchors.orphaned(), &BTreeSet::from([id("c1")]));
}

#[rstest]
fn fragmented_range_collapses_to_one_entry(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 20);

    // Unset the middle: [10,14) and [16,20) stay tagged, both four long.
    editor
        .dispatch(&Transaction::from(Cmd::RemoveMark {
            range: 14..16,
            mark: Mark::anchor(id("c1")),
        }))
        .unwrap();

    let ranges = editor.state().anchors().ranges();
    assert_eq!(ranges.len(), 1);
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 14)));
}

#[rstest]
fn fragmented_range_keeps_the_larger_fragment(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 20);

    editor
        .dispatch(&Transaction::from(Cmd::RemoveMark {
            range: 12..14,
            mark: Mark::anchor(id("c1")),
        }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(14, 20)));
}

#[rstest]
fn deleting_the_middle_text_keeps_one_contiguous_range(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 20);

    editor
        .dispatch(&Transaction::from(Cmd::DeleteRange { range: 14..16 }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 18)));
}

#[rstest]
fn overlapping_ids_both_hit(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 20);
    mark(&mut editor, "c2", 15, 25);

    let anchors = editor.state().anchors();
    assert_eq!(anchors.hit_test(17), BTreeSet::from([id("c1"), id("c2")]));
    assert_eq!(anchors.hit_test(12), BTreeSet::from([id("c1")]));
    assert_eq!(anchors.hit_test(22), BTreeSet::from([id("c2")]));
    assert_eq!(anchors.hit_test(25), BTreeSet::new());
}

#[rstest]
fn same_id_on_disjoint_spans_is_one_entry(mut editor: Editor) {
    let tx = Transaction::new()
        .with(Cmd::AddMark {
            range: 2..5,
            mark: Mark::anchor(id("c1")),
        })
        .with(Cmd::AddMark {
            range: 10..14,
            mark: Mark::anchor(id("c1")),
        });
    editor.dispatch(&tx).unwrap();

    let ranges = editor.state().anchors().ranges();
    assert_eq!(ranges.len(), 1);
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 14)));
    // The smaller fragment is not hit-testable.
    assert!(editor.state().anchors().hit_test(3).is_empty());
}

#[rstest]
fn typing_at_the_end_of_a_range_does_not_extend_it(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 14);

    editor
        .dispatch(&Transaction::from(Cmd::InsertText {
            at: 14,
            text: "!!".to_string(),
        }))
        .unwrap();
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 14)));

    editor
        .dispatch(&Transaction::from(Cmd::InsertText {
            at: 12,
            text: "--".to_string(),
        }))
        .unwrap();
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 16)));
}

#[rstest]
fn splitting_a_block_inside_a_range_keeps_one_range(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 14);

    editor
        .dispatch(&Transaction::from(Cmd::SplitBlock { at: 12 }))
        .unwrap();

    assert_eq!(editor.doc().blocks().len(), 2);
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 15)));
}

#[rstest]
fn one_notification_per_commit_even_for_batched_edits(mut editor: Editor) {
    let changes: Rc<RefCell<Vec<AnchorChange>>> = Rc::default();
    let sink = Rc::clone(&changes);
    editor.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    let tx = Transaction::new()
        .with(Cmd::AddMark {
            range: 0..4,
            mark: Mark::anchor(id("c1")),
        })
        .with(Cmd::DeleteRange { range: 0..4 })
        .with(Cmd::AddMark {
            range: 0..2,
            mark: Mark::anchor(id("c2")),
        });
    editor.dispatch(&tx).unwrap();

    let changes = changes.borrow();
    assert_eq!(changes.len(), 1);
    // c1 only existed inside the transaction and is never observed.
    assert_eq!(changes[0].added, BTreeSet::from([id("c2")]));
    assert!(changes[0].removed.is_empty());
}

#[rstest]
fn undo_brings_a_deleted_anchor_back(mut editor: Editor) {
    editor.set_selection(Selection::new(10, 14)).unwrap();
    editor.attach_annotation("c1").unwrap();
    editor
        .dispatch(&Transaction::from(Cmd::DeleteRange { range: 8..16 }))
        .unwrap();
    assert_eq!(range_of(&editor, "c1"), None);

    let patch = editor.undo().unwrap();
    assert_eq!(patch.anchors.added, BTreeSet::from([id("c1")]));
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 14)));
}

#[rstest]
fn rich_paste_carries_anchors(mut editor: Editor) {
    let leaves = vec![
        TextLeaf::plain("<<"),
        TextLeaf::marked("pasted", [Mark::anchor(id("c9"))]),
    ];
    editor
        .dispatch(&Transaction::from(Cmd::InsertLeaves { at: 5, leaves }))
        .unwrap();
    assert_eq!(range_of(&editor, "c9"), Some(AnchorRange::new(7, 13)));
}

#[rstest]
fn scroll_target_and_active_overlay(mut editor: Editor) {
    mark(&mut editor, "c1", 10, 14);
    editor.set_active_annotation(Some(id("c1")));

    let anchors = editor.state().anchors();
    assert_eq!(anchors.scroll_target(&id("c1")), Some(10));
    let active = anchors.decorations().active().unwrap();
    assert_eq!((active.from, active.to), (10, 14));
    assert_eq!(active.class, "anchor-highlight-active");

    // The overlay follows the range across commits.
    editor
        .dispatch(&Transaction::from(Cmd::InsertText {
            at: 0,
            text: "ab".to_string(),
        }))
        .unwrap();
    let active = editor.state().anchors().decorations().active().unwrap();
    assert_eq!((active.from, active.to), (12, 16));
}

/// `"0123456789"`, then c1 over `"ab"` and a bold `"cdef"`: c1 = [10,16).
fn formatted_annotation() -> Editor {
    init_logging();
    let doc = Document::from_blocks(vec![Block::paragraph(vec![
        TextLeaf::plain("0123456789"),
        TextLeaf::marked("ab", [Mark::anchor(id("c1"))]),
        TextLeaf::marked("cdef", [Mark::anchor(id("c1")), Mark::Strong]),
    ])]);
    Editor::new(doc, &EngineSettings::default())
}

#[test]
fn typing_where_formatting_changes_inside_a_range_grows_it() {
    let mut editor = formatted_annotation();
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 16)));

    editor
        .dispatch(&Transaction::from(Cmd::InsertText {
            at: 12,
            text: "X".to_string(),
        }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 17)));
    assert_eq!(
        editor.state().anchors().hit_test(10),
        BTreeSet::from([id("c1")])
    );
}

#[test]
fn pasting_where_formatting_changes_inside_a_range_grows_it() {
    let mut editor = formatted_annotation();

    let leaves = vec![
        TextLeaf::plain("<<"),
        TextLeaf::marked("zz", [Mark::anchor(id("c9"))]),
    ];
    editor
        .dispatch(&Transaction::from(Cmd::InsertLeaves { at: 12, leaves }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(10, 20)));
    assert_eq!(range_of(&editor, "c9"), Some(AnchorRange::new(14, 16)));
}

#[test]
fn typing_at_the_block_edge_of_a_cross_block_range_grows_it() {
    let mut editor = Editor::new(
        Document::from_text("Hello\nWorld"),
        &EngineSettings::default(),
    );
    editor
        .dispatch(&Transaction::from(Cmd::AddMark {
            range: 3..8,
            mark: Mark::anchor(id("c1")),
        }))
        .unwrap();
    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(3, 8)));

    editor
        .dispatch(&Transaction::from(Cmd::InsertText {
            at: 5,
            text: "!".to_string(),
        }))
        .unwrap();

    assert_eq!(range_of(&editor, "c1"), Some(AnchorRange::new(3, 9)));
}
