//! Board Patch - sparse board edits reconciled into document patches
//!
//! A board is an unordered set of `{position, token}` entries stored in a
//! remote document. Every user edit (move, delete, reset) becomes a short,
//! order-sensitive list of primitive patch operations, so the caller never has
//! to resend the whole board and at most one entry ever sits on a square.
//!
//! # Architecture
//!
//! - **Model**: [`BoardEntry`], [`Board`] and the label newtypes
//! - **Adapter**: [`to_display_form`], [`BoardView`], [`Preview`] for renderers
//! - **Patches**: [`PatchOp`] / [`PatchOpList`], transport-neutral edits
//! - **Reconciler**: [`Reconciler`], the selection state machine
//! - **Store**: [`DocumentStore`] and the in-memory [`MemoryDocument`]
//! - **Session**: [`BoardSession`], a reconciler wired to a store
//!
//! # Example
//!
//! ```
//! use board_patch::{BoardConfig, BoardSession, Intent, MemoryDocument};
//!
//! # fn example() -> Result<(), board_patch::StoreError> {
//! let mut session = BoardSession::new(BoardConfig::default(), MemoryDocument::new());
//! session.handle(&Intent::Initialize)?;
//! let patches = session.handle(&Intent::move_token("e2", "e4", "P"))?;
//! assert_eq!(patches.len(), 5);
//! assert_eq!(session.board()?.len(), 32);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod config;
mod contracts;
mod display;
mod entry;
mod intent;
mod invariants;
mod lineup;
mod patch;
mod reconciler;
mod session;
mod store;

// Crate-level exports - Data model
pub use board::Board;
pub use entry::{BoardEntry, PositionLabel, TokenLabel};
pub use lineup::{STANDARD_LINEUP, standard_board, standard_lineup};

// Crate-level exports - Board model adapter
pub use display::{BlockPreview, BoardView, Preview, PreviewLayout, UNTITLED, to_display_form};

// Crate-level exports - Patches
pub use patch::{Anchor, AttributePath, PatchOp, PatchOpList, Selector};

// Crate-level exports - Reconciler
pub use intent::Intent;
pub use reconciler::{Reconciler, ResetOutcome, SelectionState};

// Crate-level exports - Invariants and contracts
pub use contracts::{DeleteContract, InitializeContract, MoveContract, check_postconditions};
pub use invariants::{Invariant, InvariantViolation, UniquePositions};

// Crate-level exports - Document store
pub use store::{DocumentStore, MemoryDocument, StoreError};

// Crate-level exports - Session and configuration
pub use config::{BoardConfig, ConfigError, TYPE_TAG};
pub use session::BoardSession;
