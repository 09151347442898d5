//! Board model adapter and preview data for rendering surfaces.
//!
//! The document keeps positions and tokens apart so either can be queried.
//! Renderers usually want them fused into `token@position` labels; that
//! conversion only ever goes one way. Intents are expressed in positions and
//! tokens, never by re-parsing a flattened label.

use crate::board::Board;
use crate::store::StoreError;
use derive_getters::Getters;
use serde_json::Value;
use tracing::{debug, instrument};

/// Flattens a board into `token@position` labels, keeping order.
pub fn to_display_form(board: &Board) -> Vec<String> {
    board.iter().map(|entry| entry.display_label()).collect()
}

/// What a rendering surface receives.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BoardView {
    /// Current board.
    board: Board,
    /// Whether the surface may raise move intents.
    moves_allowed: bool,
    /// Whether square labels are drawn.
    labels_visible: bool,
}

impl BoardView {
    /// Interactive editor view: moves allowed, labels drawn.
    pub fn editor(board: Board) -> Self {
        Self {
            board,
            moves_allowed: true,
            labels_visible: true,
        }
    }

    /// Read-only compact preview: no moves, no labels.
    pub fn preview(board: Board) -> Self {
        Self {
            board,
            moves_allowed: false,
            labels_visible: false,
        }
    }

    /// Flattened labels for the renderer.
    pub fn pieces(&self) -> Vec<String> {
        to_display_form(&self.board)
    }
}

/// Where a preview is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PreviewLayout {
    /// Inside block content, with room for the board.
    Block,
    /// Lists and other compact places.
    Default,
}

/// Rich preview used in block layout.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BlockPreview {
    /// Title, `<Untitled>` when unset.
    title: String,
    /// Description, empty when unset.
    description: String,
    /// Read-only board view.
    view: BoardView,
}

/// Preview of a board document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Board with title and description.
    Block(BlockPreview),
    /// No room for a board; the host's generic preview applies.
    Default,
}

/// Title shown for documents without one.
pub const UNTITLED: &str = "<Untitled>";

impl Preview {
    /// Builds a preview from a whole document value (which may be null).
    #[instrument(skip(document))]
    pub fn from_document(
        document: &Value,
        board_attribute: &str,
        layout: PreviewLayout,
    ) -> Result<Self, StoreError> {
        if layout != PreviewLayout::Block {
            debug!("Deferring to default preview");
            return Ok(Preview::Default);
        }
        let text = |field: &str| document.get(field).and_then(Value::as_str);
        let board = Board::from_document(document.get(board_attribute))?;
        Ok(Preview::Block(BlockPreview {
            title: text("title").unwrap_or(UNTITLED).to_string(),
            description: text("description").unwrap_or_default().to_string(),
            view: BoardView::preview(board),
        }))
    }
}
