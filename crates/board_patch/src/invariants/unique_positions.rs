//! At most one entry per position.

use super::Invariant;
use crate::board::Board;
use std::collections::HashSet;
use tracing::warn;

/// Invariant: no two entries on a board share a position.
pub struct UniquePositions;

impl UniquePositions {
    /// Positions held by more than one entry, in first-seen order.
    pub fn duplicates(board: &Board) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        board
            .iter()
            .map(|entry| entry.position().as_str())
            .filter(|position| !seen.insert(*position) && reported.insert(*position))
            .map(str::to_string)
            .collect()
    }
}

impl Invariant<Board> for UniquePositions {
    fn holds(board: &Board) -> bool {
        let duplicates = Self::duplicates(board);
        if !duplicates.is_empty() {
            warn!(?duplicates, "Several entries share a position");
        }
        duplicates.is_empty()
    }

    fn description() -> &'static str {
        "At most one entry per position"
    }
}
