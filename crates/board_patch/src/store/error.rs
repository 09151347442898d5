//! Document store error types.

use crate::patch::AttributePath;

/// Failure while applying a patch to, or reading from, a document.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoreError {
    /// A path segment runs through something that is not an object.
    #[display("Cannot descend into {} at {}: not an object", _1, _0)]
    NotAnObject(AttributePath, String),

    /// The target of a collection operation is not an array.
    #[display("Value at {} is not a collection", _0)]
    NotACollection(AttributePath),

    /// An insert targeted a collection that does not exist.
    #[display("No collection at {} to insert into", _0)]
    MissingCollection(AttributePath),

    /// An insert anchor points past the end of the collection.
    #[display("Anchor index {} out of range for {} (len {})", _1, _0, _2)]
    AnchorOutOfRange(AttributePath, usize, usize),

    /// Stored data does not have the expected shape.
    #[display("Malformed document: {}", _0)]
    Malformed(String),
}

impl std::error::Error for StoreError {}
