//! Sparse board snapshot.

use crate::entry::{BoardEntry, PositionLabel};
use crate::store::{StoreError, value_kind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

/// An ordered sequence of entries as last read from the document.
///
/// The board is a snapshot: the remote document may already have moved on by
/// the time any patch derived from it is applied. Lookups do not depend on
/// entry order, insertion patches do (new entries are appended).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    entries: Vec<BoardEntry>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from entries in document order.
    pub fn from_entries(entries: impl IntoIterator<Item = BoardEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Reads a board from the value stored at the board attribute.
    ///
    /// A missing attribute or `null` is the empty board.
    #[instrument(skip(value))]
    pub fn from_document(value: Option<&Value>) -> Result<Self, StoreError> {
        match value {
            None | Some(Value::Null) => Ok(Self::new()),
            Some(array) if array.is_array() => {
                serde_json::from_value(array.clone()).map_err(|e| {
                    warn!(error = %e, "Board attribute holds malformed entries");
                    StoreError::Malformed(e.to_string())
                })
            }
            Some(other) => {
                warn!(kind = value_kind(other), "Board attribute is not an array");
                Err(StoreError::Malformed(format!(
                    "expected an array of entries, found {}",
                    value_kind(other)
                )))
            }
        }
    }

    /// Returns the entries in document order.
    pub fn entries(&self) -> &[BoardEntry] {
        &self.entries
    }

    /// Iterates the entries in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, BoardEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no square is occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first entry at `position`, if any.
    pub fn get(&self, position: &PositionLabel) -> Option<&BoardEntry> {
        self.entries.iter().find(|entry| entry.is_at(position))
    }

    /// Counts entries at `position`. Anything above one is a corrupted board.
    pub fn occupants(&self, position: &PositionLabel) -> usize {
        self.entries.iter().filter(|entry| entry.is_at(position)).count()
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a BoardEntry;
    type IntoIter = std::slice::Iter<'a, BoardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<BoardEntry> for Board {
    fn from_iter<I: IntoIterator<Item = BoardEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}
