//! A reconciler wired to a document store.
//!
//! Each call derives patches and hands them to the store. Intents are handled
//! one at a time to completion. Only selection parses the stored board, so a
//! malformed board never blocks the writes that repair it.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::contracts::check_postconditions;
use crate::display::BoardView;
use crate::intent::Intent;
use crate::patch::PatchOpList;
use crate::reconciler::{Reconciler, ResetOutcome, SelectionState};
use crate::store::DocumentStore;
use tracing::{info, instrument, warn};

/// Drives a [`Reconciler`] against a [`DocumentStore`].
#[derive(Debug)]
pub struct BoardSession<S> {
    reconciler: Reconciler,
    store: S,
}

impl<S: DocumentStore> BoardSession<S> {
    /// Creates a session over `store`.
    #[instrument(skip(config, store))]
    pub fn new(config: BoardConfig, store: S) -> Self {
        info!("Creating board session");
        Self {
            reconciler: Reconciler::new(config),
            store,
        }
    }

    /// Current board, empty when the attribute is missing.
    pub fn board(&self) -> Result<Board, S::Error> {
        let board = self.store.read_board(&self.reconciler.config().board_path())?;
        Ok(board.unwrap_or_default())
    }

    /// Editor view of the current board.
    pub fn view(&self) -> Result<BoardView, S::Error> {
        Ok(BoardView::editor(self.board()?))
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionState {
        self.reconciler.selection()
    }

    /// The reconciler.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the session, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Handles one intent and applies the resulting patches.
    #[instrument(skip(self), fields(intent = intent.name()))]
    pub fn handle(&mut self, intent: &Intent) -> Result<PatchOpList, S::Error> {
        let snapshot = match intent {
            Intent::SelectAt { .. } => self.board()?,
            Intent::Initialize | Intent::Move { .. } | Intent::Delete { .. } => Board::new(),
        };
        let patches = self.reconciler.dispatch(intent, &snapshot, &mut self.store)?;
        self.verify(intent, &patches);
        Ok(patches)
    }

    /// Delete-key signal: deletes the selection if there is one.
    #[instrument(skip(self))]
    pub fn press_delete_key(&mut self) -> Result<PatchOpList, S::Error> {
        let selected = self.selection().entry().map(|entry| entry.position().clone());
        let patches = self.reconciler.handle_delete_key();
        self.store.apply(&patches)?;
        if let Some(position) = selected {
            self.verify(&Intent::Delete { position }, &patches);
        }
        Ok(patches)
    }

    /// Requests a reset; see [`Reconciler::request_reset`].
    #[instrument(skip(self))]
    pub fn request_reset(&mut self) -> Result<ResetOutcome, S::Error> {
        let board_exists = self
            .store
            .contains(&self.reconciler.config().board_path())?;
        let outcome = self.reconciler.request_reset(board_exists);
        if let ResetOutcome::Initialized(patches) = &outcome {
            self.store.apply(patches)?;
            self.verify(&Intent::Initialize, patches);
        }
        Ok(outcome)
    }

    /// Confirms a pending reset.
    #[instrument(skip(self))]
    pub fn confirm_reset(&mut self) -> Result<PatchOpList, S::Error> {
        let patches = self.reconciler.confirm_reset();
        if !patches.is_empty() {
            self.store.apply(&patches)?;
            self.verify(&Intent::Initialize, &patches);
        }
        Ok(patches)
    }

    /// Abandons a pending reset.
    pub fn cancel_reset(&mut self) {
        self.reconciler.cancel_reset();
    }

    /// Applies patches from a nested field editor under `field`.
    #[instrument(skip(self, patches))]
    pub fn change_field(
        &mut self,
        field: &str,
        patches: PatchOpList,
    ) -> Result<PatchOpList, S::Error> {
        let patches = self.reconciler.handle_field_change(field, patches);
        self.store.apply(&patches)?;
        Ok(patches)
    }

    /// Re-reads the board and reports broken postconditions.
    ///
    /// Violations are logged only, as is a board that no longer parses. A
    /// board with duplicate positions heals on the next move through the
    /// affected square.
    fn verify(&self, intent: &Intent, patches: &PatchOpList) {
        if !cfg!(debug_assertions) {
            return;
        }
        let after = match self.board() {
            Ok(board) => board,
            Err(error) => {
                warn!(intent = %intent, %error, "Board unreadable after apply");
                return;
            }
        };
        let lineup = self.reconciler.config().lineup();
        if let Err(violations) = check_postconditions(intent, !patches.is_empty(), lineup, &after) {
            for violation in &violations {
                warn!(intent = %intent, %violation, "Postcondition failed");
            }
        }
    }
}
