//! Canonical starting layout.

use crate::board::Board;
use crate::entry::BoardEntry;

/// Standard chess opening position as `(position, token)` pairs.
///
/// Uppercase tokens are white, lowercase are black. Ranks 1-2 and 7-8 are
/// occupied, one entry per square, grouped by file.
pub const STANDARD_LINEUP: [(&str, &str); 32] = [
    ("a1", "R"), ("a2", "P"), ("a7", "p"), ("a8", "r"),
    ("b1", "N"), ("b2", "P"), ("b7", "p"), ("b8", "n"),
    ("c1", "B"), ("c2", "P"), ("c7", "p"), ("c8", "b"),
    ("d1", "Q"), ("d2", "P"), ("d7", "p"), ("d8", "q"),
    ("e1", "K"), ("e2", "P"), ("e7", "p"), ("e8", "k"),
    ("f1", "B"), ("f2", "P"), ("f7", "p"), ("f8", "b"),
    ("g1", "N"), ("g2", "P"), ("g7", "p"), ("g8", "n"),
    ("h1", "R"), ("h2", "P"), ("h7", "p"), ("h8", "r"),
];

/// The standard lineup as board entries.
pub fn standard_lineup() -> Vec<BoardEntry> {
    STANDARD_LINEUP
        .iter()
        .map(|(position, token)| BoardEntry::new(*position, *token))
        .collect()
}

/// The standard lineup as a board.
pub fn standard_board() -> Board {
    Board::from_entries(standard_lineup())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineup_shape() {
        let board = standard_board();
        assert_eq!(board.len(), 32);
        for rank in ["3", "4", "5", "6"] {
            assert!(board.iter().all(|entry| !entry.position().as_str().ends_with(rank)));
        }
        let white = board
            .iter()
            .filter(|entry| entry.token().as_str().chars().all(|c| c.is_ascii_uppercase()))
            .count();
        assert_eq!(white, 16);
    }

    #[test]
    fn test_lineup_kings_and_queens() {
        let board = standard_board();
        assert_eq!(board.get(&"e1".into()).map(|e| e.token().as_str()), Some("K"));
        assert_eq!(board.get(&"d1".into()).map(|e| e.token().as_str()), Some("Q"));
        assert_eq!(board.get(&"e8".into()).map(|e| e.token().as_str()), Some("k"));
        assert_eq!(board.get(&"d8".into()).map(|e| e.token().as_str()), Some("q"));
    }
}
