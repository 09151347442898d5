//! Intents raised by the presentation layer.

use crate::entry::{PositionLabel, TokenLabel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user intent. None of them carry document-wide context; the reconciler
/// supplies that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "intent", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Intent {
    /// Install the starting layout, replacing any board.
    Initialize,
    /// Move `token` from one square to another.
    Move {
        /// Source square.
        from: PositionLabel,
        /// Destination square.
        to: PositionLabel,
        /// Token being moved.
        token: TokenLabel,
    },
    /// Remove whatever sits on `position`.
    Delete {
        /// Square to clear.
        position: PositionLabel,
    },
    /// Select the entry on `position`.
    SelectAt {
        /// Square to select.
        position: PositionLabel,
    },
}

impl Intent {
    /// Builds a move intent.
    pub fn move_token(
        from: impl Into<PositionLabel>,
        to: impl Into<PositionLabel>,
        token: impl Into<TokenLabel>,
    ) -> Self {
        Intent::Move {
            from: from.into(),
            to: to.into(),
            token: token.into(),
        }
    }

    /// Builds a delete intent.
    pub fn delete(position: impl Into<PositionLabel>) -> Self {
        Intent::Delete {
            position: position.into(),
        }
    }

    /// Builds a select intent.
    pub fn select(position: impl Into<PositionLabel>) -> Self {
        Intent::SelectAt {
            position: position.into(),
        }
    }

    /// Short intent name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Initialize => write!(f, "initialize"),
            Intent::Move { from, to, token } => write!(f, "move {} {} -> {}", token, from, to),
            Intent::Delete { position } => write!(f, "delete {}", position),
            Intent::SelectAt { position } => write!(f, "select {}", position),
        }
    }
}
