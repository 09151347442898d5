//! Document-store collaborator.
//!
//! The reconciler never touches a document directly. It hands a
//! [`PatchOpList`] to something implementing [`DocumentStore`], which applies
//! the operations in order. Whether a store applies a list atomically is up to
//! the store; [`MemoryDocument`] does not.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryDocument;

use crate::board::Board;
use crate::patch::{Anchor, AttributePath, PatchOp, PatchOpList, Selector};
use serde_json::Value;
use tracing::{debug, instrument};

/// The four patch primitives plus a board read.
pub trait DocumentStore {
    /// Failure raised by the underlying store.
    type Error: std::error::Error;

    /// Installs `value` at `path` only if `path` is absent or null.
    fn ensure_default(&mut self, path: &AttributePath, value: &Value) -> Result<(), Self::Error>;

    /// Replaces whatever is at `path` with `value`.
    fn set_value(&mut self, path: &AttributePath, value: &Value) -> Result<(), Self::Error>;

    /// Removes every element of the collection at `path` matching `selector`.
    ///
    /// Returns the number of removed elements. A missing collection removes
    /// nothing.
    fn remove_matching(
        &mut self,
        path: &AttributePath,
        selector: &Selector,
    ) -> Result<usize, Self::Error>;

    /// Inserts `elements`, in order, right after `anchor` in the collection at `path`.
    fn insert_after(
        &mut self,
        path: &AttributePath,
        anchor: Anchor,
        elements: &[Value],
    ) -> Result<(), Self::Error>;

    /// True when something other than null is stored at `path`.
    ///
    /// Does not look at the value's shape, so a malformed board still counts.
    fn contains(&self, path: &AttributePath) -> Result<bool, Self::Error>;

    /// Reads the board stored at `path`. `None` when the attribute is absent.
    fn read_board(&self, path: &AttributePath) -> Result<Option<Board>, Self::Error>;

    /// Applies `patches` in order, stopping at the first failure.
    ///
    /// No retry happens here: re-running removals and inserts against a
    /// document that changed in between can break position uniqueness.
    #[instrument(skip(self, patches), fields(ops = patches.len()))]
    fn apply(&mut self, patches: &PatchOpList) -> Result<(), Self::Error> {
        for op in patches {
            debug!(op = op.name(), path = %op.path(), "Applying patch op");
            match op {
                PatchOp::EnsureDefault { path, value } => self.ensure_default(path, value)?,
                PatchOp::SetValue { path, value } => self.set_value(path, value)?,
                PatchOp::RemoveMatching { path, selector } => {
                    let removed = self.remove_matching(path, selector)?;
                    debug!(removed, %selector, "Removed matching elements");
                }
                PatchOp::InsertAfter {
                    path,
                    anchor,
                    elements,
                } => self.insert_after(path, *anchor, elements)?,
            }
        }
        Ok(())
    }
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
