//! Patch reconciler: turns intents into ordered patch lists.
//!
//! The reconciler owns one piece of transient state, the current selection,
//! plus whether a reset is waiting for confirmation. Everything else comes in
//! with each call: the board it receives is a snapshot that may be stale by
//! the time its patches land, so removals match by position rather than by
//! index and every move re-creates the containers it writes into.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::entry::{BoardEntry, PositionLabel, TokenLabel};
use crate::intent::Intent;
use crate::patch::{Anchor, PatchOp, PatchOpList, Selector};
use crate::store::DocumentStore;
use serde_json::Value;
use tracing::{debug, info, instrument};

// ─────────────────────────────────────────────────────────────
//  Local state
// ─────────────────────────────────────────────────────────────

/// Single-slot selection. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Empty,
    /// This entry is selected.
    Holding(BoardEntry),
}

impl SelectionState {
    /// The selected entry, if any.
    pub fn entry(&self) -> Option<&BoardEntry> {
        match self {
            SelectionState::Empty => None,
            SelectionState::Holding(entry) => Some(entry),
        }
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionState::Empty)
    }
}

/// Result of asking for a reset.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    /// There was no board yet, so it was initialized right away.
    Initialized(PatchOpList),
    /// A board exists; the caller must confirm before it is replaced.
    AwaitingConfirmation,
}

// ─────────────────────────────────────────────────────────────
//  Reconciler
// ─────────────────────────────────────────────────────────────

/// Converts intents into patch lists while keeping at most one entry per
/// position.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: BoardConfig,
    selection: SelectionState,
    reset_pending: bool,
}

impl Reconciler {
    /// Creates a reconciler with an empty selection.
    #[instrument(skip(config), fields(type_name = %config.type_name(), board = %config.board_attribute()))]
    pub fn new(config: BoardConfig) -> Self {
        info!("Creating reconciler");
        Self {
            config,
            selection: SelectionState::Empty,
            reset_pending: false,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// True while a reset waits for confirmation.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Drops the selection, e.g. when the board was replaced elsewhere.
    pub fn clear_selection(&mut self) {
        self.selection = SelectionState::Empty;
    }

    fn ensure_type_tag(&self) -> PatchOp {
        PatchOp::EnsureDefault {
            path: self.config.type_path(),
            value: Value::String(self.config.type_name().clone()),
        }
    }

    fn remove_at(&self, position: &PositionLabel) -> PatchOp {
        PatchOp::RemoveMatching {
            path: self.config.board_path(),
            selector: Selector::position(position),
        }
    }

    /// Replaces the board wholesale with the starting layout.
    ///
    /// The only full replace the reconciler emits; used for first-time setup
    /// and confirmed resets alike. Clears the selection, which may point at a
    /// square that no longer exists.
    #[instrument(skip(self))]
    pub fn handle_initialize(&mut self) -> PatchOpList {
        self.clear_selection();
        let lineup = self.config.lineup().iter().map(Value::from).collect();
        let patches = PatchOpList::from(vec![
            self.ensure_type_tag(),
            PatchOp::SetValue {
                path: self.config.board_path(),
                value: Value::Array(lineup),
            },
        ]);
        info!(entries = self.config.lineup().len(), "Initializing board");
        patches
    }

    /// Selects the entry at `position`, or nothing if the square is empty.
    #[instrument(skip(self, board), fields(entries = board.len()))]
    pub fn handle_select(&mut self, position: &PositionLabel, board: &Board) -> &SelectionState {
        self.selection = match board.get(position) {
            Some(entry) => {
                debug!(%entry, "Selected entry");
                SelectionState::Holding(entry.clone())
            }
            None => {
                debug!("Selected square is empty");
                SelectionState::Empty
            }
        };
        &self.selection
    }

    /// Moves `token` from `from` to `to`.
    ///
    /// Afterwards exactly one entry sits on `to`, holding `token`, and none on
    /// `from` unless the two are the same square. Both containers are
    /// re-ensured first because another actor may have reset or nulled the
    /// document since the last read. Both removals precede the insert so the
    /// new entry can never be caught by a same-position removal.
    #[instrument(skip(self))]
    pub fn handle_move(
        &mut self,
        from: &PositionLabel,
        to: &PositionLabel,
        token: &TokenLabel,
    ) -> PatchOpList {
        self.clear_selection();
        let moved = BoardEntry::new(to.clone(), token.clone());
        let patches = PatchOpList::from(vec![
            self.ensure_type_tag(),
            PatchOp::EnsureDefault {
                path: self.config.board_path(),
                value: Value::Array(Vec::new()),
            },
            self.remove_at(from),
            self.remove_at(to),
            PatchOp::InsertAfter {
                path: self.config.board_path(),
                anchor: Anchor::Last,
                elements: vec![Value::from(&moved)],
            },
        ]);
        info!(%moved, ops = patches.len(), "Moving token");
        patches
    }

    /// Removes whatever sits on `position`.
    ///
    /// No containers are ensured: without a board there is nothing to remove
    /// and the removal is already a no-op.
    #[instrument(skip(self))]
    pub fn handle_delete(&mut self, position: &PositionLabel) -> PatchOpList {
        self.clear_selection();
        info!("Deleting entry");
        PatchOpList::from(vec![self.remove_at(position)])
    }

    /// Translates a raw delete-key press into a delete of the selection.
    ///
    /// Without a selection nothing is emitted, not even container setup.
    #[instrument(skip(self))]
    pub fn handle_delete_key(&mut self) -> PatchOpList {
        match std::mem::take(&mut self.selection) {
            SelectionState::Holding(entry) => self.handle_delete(entry.position()),
            SelectionState::Empty => {
                debug!("Delete key pressed with nothing selected");
                PatchOpList::new()
            }
        }
    }

    /// Handles one intent against the latest known board.
    ///
    /// A delete intent is ignored while nothing is selected. Select emits no
    /// patches.
    #[instrument(skip(self, board), fields(intent = intent.name()))]
    pub fn handle_intent(&mut self, intent: &Intent, board: &Board) -> PatchOpList {
        match intent {
            Intent::Initialize => self.handle_initialize(),
            Intent::Move { from, to, token } => self.handle_move(from, to, token),
            Intent::Delete { position } => {
                if self.selection.is_empty() {
                    debug!(%position, "Ignoring delete without a selection");
                    PatchOpList::new()
                } else {
                    self.handle_delete(position)
                }
            }
            Intent::SelectAt { position } => {
                self.handle_select(position, board);
                PatchOpList::new()
            }
        }
    }

    /// Handles an intent and hands the patches straight to `store`.
    ///
    /// A store failure is returned as is. Nothing is retried: the caller must
    /// re-read the board and derive a fresh intent.
    #[instrument(skip(self, board, store), fields(intent = intent.name()))]
    pub fn dispatch<S: DocumentStore>(
        &mut self,
        intent: &Intent,
        board: &Board,
        store: &mut S,
    ) -> Result<PatchOpList, S::Error> {
        let patches = self.handle_intent(intent, board);
        store.apply(&patches)?;
        Ok(patches)
    }

    // ─────────────────────────────────────────────────────────
    //  Reset confirmation
    // ─────────────────────────────────────────────────────────

    /// Asks for a reset. `board_exists` is false when the attribute is absent.
    ///
    /// A missing board is initialized at once; an existing one, even an empty
    /// or unreadable one, needs [`Reconciler::confirm_reset`].
    #[instrument(skip(self))]
    pub fn request_reset(&mut self, board_exists: bool) -> ResetOutcome {
        if !board_exists {
            return ResetOutcome::Initialized(self.handle_initialize());
        }
        debug!("Reset awaiting confirmation");
        self.reset_pending = true;
        ResetOutcome::AwaitingConfirmation
    }

    /// Confirms a pending reset. Empty list if none was pending.
    #[instrument(skip(self), fields(pending = self.reset_pending))]
    pub fn confirm_reset(&mut self) -> PatchOpList {
        if !std::mem::replace(&mut self.reset_pending, false) {
            debug!("No reset pending");
            return PatchOpList::new();
        }
        self.handle_initialize()
    }

    /// Abandons a pending reset.
    #[instrument(skip(self), fields(pending = self.reset_pending))]
    pub fn cancel_reset(&mut self) {
        self.reset_pending = false;
    }

    // ─────────────────────────────────────────────────────────
    //  Other attributes
    // ─────────────────────────────────────────────────────────

    /// Re-roots patches from a nested field editor under `field`.
    ///
    /// Field editors emit root-relative patches with no knowledge of where
    /// they live. The type tag is ensured first since the document may not
    /// exist yet.
    #[instrument(skip(self, patches), fields(ops = patches.len()))]
    pub fn handle_field_change(&self, field: &str, patches: PatchOpList) -> PatchOpList {
        patches.prefix_all(field).prepend(self.ensure_type_tag())
    }
}
