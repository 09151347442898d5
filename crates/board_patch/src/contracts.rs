//! Postconditions for applied intents.
//!
//! Each contract states what a board must look like once an intent's patches
//! have been applied to a document nobody else touched in between.

use crate::board::Board;
use crate::entry::{BoardEntry, PositionLabel, TokenLabel};
use crate::intent::Intent;
use crate::invariants::{Invariant, InvariantViolation, UniquePositions};
use tracing::{instrument, warn};

/// Postcondition of a move: exactly one `token` on `to`, nothing left on `from`.
pub struct MoveContract;

impl MoveContract {
    /// Checks the move postcondition against the resulting board.
    #[instrument(skip(after))]
    pub fn post(
        from: &PositionLabel,
        to: &PositionLabel,
        token: &TokenLabel,
        after: &Board,
    ) -> Result<(), InvariantViolation> {
        let occupants = after.occupants(to);
        if occupants != 1 {
            warn!(occupants, "Destination does not hold exactly one entry");
            return Err(InvariantViolation::new(format!(
                "{} holds {} entries after move, expected 1",
                to, occupants
            )));
        }
        if after.get(to).map(BoardEntry::token) != Some(token) {
            return Err(InvariantViolation::new(format!(
                "{} does not hold {} after move",
                to, token
            )));
        }
        if from != to && after.occupants(from) != 0 {
            return Err(InvariantViolation::new(format!(
                "{} still occupied after moving away",
                from
            )));
        }
        Ok(())
    }
}

/// Postcondition of a delete: the square is empty.
pub struct DeleteContract;

impl DeleteContract {
    /// Checks the delete postcondition against the resulting board.
    pub fn post(position: &PositionLabel, after: &Board) -> Result<(), InvariantViolation> {
        if after.occupants(position) == 0 {
            Ok(())
        } else {
            Err(InvariantViolation::new(format!(
                "{} still occupied after delete",
                position
            )))
        }
    }
}

/// Postcondition of initialize: the board is exactly the lineup, not a union.
pub struct InitializeContract;

impl InitializeContract {
    /// Checks the initialize postcondition against the resulting board.
    pub fn post(lineup: &[BoardEntry], after: &Board) -> Result<(), InvariantViolation> {
        if after.entries() == lineup {
            Ok(())
        } else {
            Err(InvariantViolation::new(format!(
                "board has {} entries after initialize, lineup has {}",
                after.len(),
                lineup.len()
            )))
        }
    }
}

/// Checks the intent's postcondition and position uniqueness together.
///
/// `emitted` tells whether the intent produced any patches; an ignored
/// delete has no postcondition.
#[instrument(skip(lineup, after), fields(intent = intent.name()))]
pub fn check_postconditions(
    intent: &Intent,
    emitted: bool,
    lineup: &[BoardEntry],
    after: &Board,
) -> Result<(), Vec<InvariantViolation>> {
    let mut violations = Vec::new();

    let outcome = match intent {
        Intent::Initialize => InitializeContract::post(lineup, after),
        Intent::Move { from, to, token } => MoveContract::post(from, to, token, after),
        Intent::Delete { position } if emitted => DeleteContract::post(position, after),
        Intent::Delete { .. } | Intent::SelectAt { .. } => Ok(()),
    };
    if let Err(violation) = outcome {
        violations.push(violation);
    }
    if let Err(violation) = UniquePositions::check(after) {
        violations.push(violation);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::{standard_board, standard_lineup};

    #[test]
    fn test_move_post_holds() {
        let after = Board::from_entries([BoardEntry::new("e4", "P")]);
        assert!(MoveContract::post(&"e2".into(), &"e4".into(), &"P".into(), &after).is_ok());
    }

    #[test]
    fn test_move_post_detects_leftover_source() {
        let after = Board::from_entries([BoardEntry::new("e2", "P"), BoardEntry::new("e4", "P")]);
        assert!(MoveContract::post(&"e2".into(), &"e4".into(), &"P".into(), &after).is_err());
    }

    #[test]
    fn test_move_post_detects_wrong_token() {
        let after = Board::from_entries([BoardEntry::new("e5", "p")]);
        assert!(MoveContract::post(&"d4".into(), &"e5".into(), &"N".into(), &after).is_err());
    }

    #[test]
    fn test_move_in_place_allows_same_square() {
        let after = Board::from_entries([BoardEntry::new("c3", "B")]);
        assert!(MoveContract::post(&"c3".into(), &"c3".into(), &"B".into(), &after).is_ok());
    }

    #[test]
    fn test_initialize_post_rejects_union() {
        let mut entries = standard_lineup();
        entries.push(BoardEntry::new("e4", "P"));
        let after = Board::from_entries(entries);
        assert!(InitializeContract::post(&standard_lineup(), &after).is_err());
        assert!(InitializeContract::post(&standard_lineup(), &standard_board()).is_ok());
    }

    #[test]
    fn test_ignored_delete_has_no_postcondition() {
        let after = standard_board();
        assert!(check_postconditions(&Intent::delete("e2"), false, &standard_lineup(), &after).is_ok());
        assert!(check_postconditions(&Intent::delete("e2"), true, &standard_lineup(), &after).is_err());
    }
}
