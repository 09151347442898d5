//! End-to-end scenarios: reconciler patches applied to an in-memory document.

use board_patch::{
    Anchor, AttributePath, Board, BoardConfig, BoardEntry, DocumentStore, Intent, Invariant,
    MemoryDocument, MoveContract, PatchOp, PatchOpList, Reconciler, Selector, SelectionState,
    UniquePositions, standard_lineup,
};
use serde_json::{Value, json};

fn board_path() -> AttributePath {
    AttributePath::attribute("board")
}

fn read(doc: &MemoryDocument) -> Board {
    doc.read_board(&board_path())
        .expect("Readable board")
        .unwrap_or_default()
}

/// Document holding `entries` as its board, already tagged.
fn doc_with(entries: &[(&str, &str)]) -> MemoryDocument {
    let board: Vec<Value> = entries
        .iter()
        .map(|(position, token)| json!({"position": position, "piece": token}))
        .collect();
    MemoryDocument::from_value(json!({"_type": "chessBoard", "board": board}))
}

#[test]
fn test_initialize_select_move_scenario() {
    let mut reconciler = Reconciler::new(BoardConfig::default());
    let mut doc = MemoryDocument::new();

    let board = read(&doc);
    reconciler
        .dispatch(&Intent::Initialize, &board, &mut doc)
        .expect("Initialize applies");

    let board = read(&doc);
    assert_eq!(board.len(), 32);
    assert_eq!(board.get(&"a1".into()), Some(&BoardEntry::new("a1", "R")));
    assert_eq!(board.get(&"e8".into()), Some(&BoardEntry::new("e8", "k")));

    reconciler.handle_select(&"e2".into(), &board);
    assert_eq!(
        reconciler.selection(),
        &SelectionState::Holding(BoardEntry::new("e2", "P"))
    );

    let patches = reconciler
        .dispatch(&Intent::move_token("e2", "e4", "P"), &board, &mut doc)
        .expect("Move applies");
    // EnsureDefault x2, RemoveMatching x2, InsertAfter x1
    assert_eq!(patches.len(), 5);

    let board = read(&doc);
    assert_eq!(board.len(), 32);
    assert_eq!(board.get(&"e4".into()), Some(&BoardEntry::new("e4", "P")));
    assert_eq!(board.occupants(&"e2".into()), 0);
    assert!(reconciler.selection().is_empty());
    assert_eq!(doc.value()["_type"], "chessBoard");
}

#[test]
fn test_capture_leaves_single_occupant() {
    let mut reconciler = Reconciler::default();
    let mut doc = doc_with(&[("d4", "N"), ("e5", "p")]);

    let board = read(&doc);
    reconciler
        .dispatch(&Intent::move_token("d4", "e5", "N"), &board, &mut doc)
        .expect("Move applies");

    let board = read(&doc);
    assert_eq!(board.occupants(&"e5".into()), 1);
    assert_eq!(board.get(&"e5".into()), Some(&BoardEntry::new("e5", "N")));
    assert_eq!(board.occupants(&"d4".into()), 0);
    assert_eq!(board.len(), 1);
}

#[test]
fn test_move_in_place_overwrites_occupant() {
    for prior in [&[][..], &[("c3", "b")][..], &[("c3", "B"), ("c3", "q")][..]] {
        let mut reconciler = Reconciler::default();
        let mut doc = doc_with(prior);
        let patches = reconciler.handle_move(&"c3".into(), &"c3".into(), &"B".into());
        doc.apply(&patches).expect("Move applies");

        let board = read(&doc);
        assert_eq!(board.entries(), &[BoardEntry::new("c3", "B")]);
    }
}

#[test]
fn test_initialize_replaces_rather_than_merges() {
    let mut reconciler = Reconciler::default();
    let mut doc = doc_with(&[("e4", "P"), ("d5", "p"), ("a1", "Q")]);

    let patches = reconciler.handle_initialize();
    doc.apply(&patches).expect("Initialize applies");

    assert_eq!(read(&doc).entries(), standard_lineup().as_slice());
}

#[test]
fn test_insert_before_removal_breaks_uniqueness() {
    let from = "f6".into();
    let to = "f6".into();
    let token = "N".into();

    let mut reconciler = Reconciler::default();
    let patches = reconciler.handle_move(&from, &to, &token);

    // Correct order
    let mut doc = doc_with(&[("f6", "p")]);
    doc.apply(&patches).expect("Move applies");
    assert!(MoveContract::post(&from, &to, &token, &read(&doc)).is_ok());

    // Insert moved ahead of both removals
    let ops = patches.ops();
    let reordered: PatchOpList = [&ops[0], &ops[1], &ops[4], &ops[2], &ops[3]]
        .into_iter()
        .cloned()
        .collect();
    let mut doc = doc_with(&[("f6", "p")]);
    doc.apply(&reordered).expect("Reordered list still applies");
    let board = read(&doc);
    assert!(board.get(&"f6".into()).is_none(), "Moved token was removed again");
    assert!(MoveContract::post(&from, &to, &token, &board).is_err());
}

#[test]
fn test_removals_are_required_for_uniqueness() {
    let mut doc = doc_with(&[("d4", "N"), ("e5", "p")]);
    let insert_only = PatchOpList::from(vec![PatchOp::InsertAfter {
        path: board_path(),
        anchor: Anchor::Last,
        elements: vec![json!({"position": "e5", "piece": "N"})],
    }]);
    doc.apply(&insert_only).expect("Insert applies");
    assert!(!UniquePositions::holds(&read(&doc)));
}

#[test]
fn test_delete_signal_without_selection_is_empty() {
    let mut reconciler = Reconciler::default();
    let patches = reconciler.handle_delete_key();
    assert!(patches.is_empty());

    // Nothing touches the document, not even the type tag
    let mut doc = MemoryDocument::new();
    doc.apply(&patches).expect("Empty list applies");
    assert_eq!(doc.value(), &Value::Null);
}

#[test]
fn test_delete_on_missing_board_is_noop() {
    let mut reconciler = Reconciler::default();
    let mut doc = MemoryDocument::from_value(json!({"title": "Empty"}));
    let patches = reconciler.handle_delete(&"e2".into());
    doc.apply(&patches).expect("Delete applies");
    assert_eq!(doc.value(), &json!({"title": "Empty"}));
}

#[test]
fn test_move_after_board_was_nulled_elsewhere() {
    let mut reconciler = Reconciler::default();
    let stale = Board::from_entries(standard_lineup());

    // Another actor nulled the whole document since our last read
    let mut doc = MemoryDocument::new();
    reconciler
        .dispatch(&Intent::move_token("b1", "c3", "N"), &stale, &mut doc)
        .expect("Move recreates containers");

    assert_eq!(
        doc.value(),
        &json!({"_type": "chessBoard", "board": [{"position": "c3", "piece": "N"}]})
    );
}

#[test]
fn test_move_heals_duplicate_positions() {
    let mut reconciler = Reconciler::default();
    let mut doc = doc_with(&[("e4", "P"), ("a1", "R"), ("e4", "p")]);
    assert!(!UniquePositions::holds(&read(&doc)));

    let patches = reconciler.handle_move(&"a1".into(), &"e4".into(), &"R".into());
    doc.apply(&patches).expect("Move applies");

    let board = read(&doc);
    assert!(UniquePositions::holds(&board));
    assert_eq!(board.entries(), &[BoardEntry::new("e4", "R")]);
}

#[test]
fn test_store_error_propagates() {
    let mut reconciler = Reconciler::default();
    let mut doc = MemoryDocument::from_value(json!({"board": "not a list"}));
    let result = reconciler.dispatch(&Intent::move_token("a2", "a3", "P"), &Board::new(), &mut doc);
    assert!(result.is_err());
    // Selection is cleared even when the store fails
    assert!(reconciler.selection().is_empty());
}

#[test]
fn test_custom_board_attribute() {
    let config = BoardConfig::new("checkers", "squares", vec![BoardEntry::new("b1", "w")])
        .expect("Valid config");
    let mut reconciler = Reconciler::new(config);
    let mut doc = MemoryDocument::new();
    doc.apply(&reconciler.handle_initialize()).expect("Initialize applies");
    doc.apply(&reconciler.handle_move(&"b1".into(), &"c2".into(), &"w".into()))
        .expect("Move applies");

    assert_eq!(
        doc.value(),
        &json!({"_type": "checkers", "squares": [{"position": "c2", "piece": "w"}]})
    );
    let removal = reconciler.handle_delete(&"c2".into());
    assert_eq!(
        &removal.ops()[0],
        &PatchOp::RemoveMatching {
            path: AttributePath::attribute("squares"),
            selector: Selector::position(&"c2".into()),
        }
    );
}
