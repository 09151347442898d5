//! Labels and entries that make up a sparse board.

use derive_getters::Getters;
use derive_more::{Display, From};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// An opaque key identifying a square (e.g. algebraic `e4`).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct PositionLabel(String);

impl PositionLabel {
    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PositionLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// An opaque string identifying a token kind (e.g. `P` for a white pawn).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct TokenLabel(String);

impl TokenLabel {
    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// A single occupied square.
///
/// Stored in the document as `{"position": "e2", "piece": "P"}`. The token
/// field is also accepted as `token` when reading.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Getters, derive_new::new, Serialize, Deserialize, JsonSchema,
)]
pub struct BoardEntry {
    /// Square this entry occupies.
    #[new(into)]
    position: PositionLabel,
    /// Token sitting on the square.
    #[new(into)]
    #[serde(rename = "piece", alias = "token")]
    token: TokenLabel,
}

impl BoardEntry {
    /// Flattened `token@position` label used by rendering surfaces.
    pub fn display_label(&self) -> String {
        format!("{}@{}", self.token, self.position)
    }

    /// True if this entry sits on `position`.
    pub fn is_at(&self, position: &PositionLabel) -> bool {
        &self.position == position
    }
}

impl std::fmt::Display for BoardEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

// Mirrors the serde representation so patch elements can be built without a
// fallible serializer call.
impl From<&BoardEntry> for Value {
    fn from(entry: &BoardEntry) -> Self {
        json!({
            "position": entry.position.as_str(),
            "piece": entry.token.as_str(),
        })
    }
}

impl From<BoardEntry> for Value {
    fn from(entry: BoardEntry) -> Self {
        Value::from(&entry)
    }
}
