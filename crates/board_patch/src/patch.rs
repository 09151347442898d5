//! Primitive edit operations against a named attribute path.
//!
//! Patches are plain data. They carry no transport encoding, so any document
//! store that implements the four primitives can apply them. Order inside a
//! [`PatchOpList`] is significant and must be preserved exactly.

use crate::entry::PositionLabel;
use derive_getters::Getters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────
//  Paths and selectors
// ─────────────────────────────────────────────────────────────

/// Path of object keys from the document root. Empty means the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A top-level attribute.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Extends this path by one key.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    /// Re-roots this path under `field`.
    pub fn prefixed(&self, field: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(field.to_string());
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    /// Path segments from the root.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for AttributePath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

/// Exact match on one string field of a collection element.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Getters, derive_new::new, Serialize, Deserialize, JsonSchema,
)]
pub struct Selector {
    /// Field to compare.
    #[new(into)]
    field: String,
    /// Value the field must equal.
    #[new(into)]
    value: String,
}

impl Selector {
    /// Matches elements whose `position` equals `position`.
    pub fn position(position: &PositionLabel) -> Self {
        Self::new("position", position.as_str())
    }

    /// True if `element` is an object whose selected field equals the value.
    pub fn matches(&self, element: &Value) -> bool {
        element
            .get(&self.field)
            .and_then(Value::as_str)
            .is_some_and(|candidate| candidate == self.value)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} == {:?}", self.field, self.value)
    }
}

/// Where inside an ordered collection new elements go.
///
/// On the wire this is an integer index; `-1` is [`Anchor::Last`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum Anchor {
    /// After the element at this index.
    Index(usize),
    /// After the last element, i.e. append.
    Last,
}

impl TryFrom<Anchor> for i64 {
    type Error = String;

    fn try_from(anchor: Anchor) -> Result<Self, Self::Error> {
        match anchor {
            Anchor::Index(index) => i64::try_from(index)
                .map_err(|_| format!("anchor index {} does not fit the wire format", index)),
            Anchor::Last => Ok(-1),
        }
    }
}

impl Serialize for Anchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = i64::try_from(*self).map_err(serde::ser::Error::custom)?;
        serializer.serialize_i64(raw)
    }
}

impl TryFrom<i64> for Anchor {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            -1 => Ok(Anchor::Last),
            index if index >= 0 => usize::try_from(index)
                .map(Anchor::Index)
                .map_err(|_| format!("anchor index {} is too large", index)),
            other => Err(format!("anchor index {} is not -1 or a valid index", other)),
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::Index(index) => write!(f, "{}", index),
            Anchor::Last => write!(f, "-1"),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Operations
// ─────────────────────────────────────────────────────────────

/// A single primitive edit.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, strum::IntoStaticStr,
)]
#[serde(tag = "op", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PatchOp {
    /// Set `value` at `path` only if nothing is there yet.
    EnsureDefault {
        /// Target path.
        path: AttributePath,
        /// Value to install when absent.
        value: Value,
    },
    /// Replace whatever is at `path` with `value`.
    SetValue {
        /// Target path.
        path: AttributePath,
        /// Replacement value.
        value: Value,
    },
    /// Remove every element of the collection at `path` matching `selector`.
    RemoveMatching {
        /// Collection path.
        path: AttributePath,
        /// Element filter.
        selector: Selector,
    },
    /// Insert `elements`, in order, right after `anchor`.
    InsertAfter {
        /// Collection path.
        path: AttributePath,
        /// Insertion point.
        #[schemars(with = "i64")]
        anchor: Anchor,
        /// Elements to insert.
        elements: Vec<Value>,
    },
}

impl PatchOp {
    /// Path this operation targets.
    pub fn path(&self) -> &AttributePath {
        match self {
            PatchOp::EnsureDefault { path, .. }
            | PatchOp::SetValue { path, .. }
            | PatchOp::RemoveMatching { path, .. }
            | PatchOp::InsertAfter { path, .. } => path,
        }
    }

    /// Short operation name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Same operation re-rooted under `field`.
    pub fn prefixed(self, field: &str) -> Self {
        match self {
            PatchOp::EnsureDefault { path, value } => PatchOp::EnsureDefault {
                path: path.prefixed(field),
                value,
            },
            PatchOp::SetValue { path, value } => PatchOp::SetValue {
                path: path.prefixed(field),
                value,
            },
            PatchOp::RemoveMatching { path, selector } => PatchOp::RemoveMatching {
                path: path.prefixed(field),
                selector,
            },
            PatchOp::InsertAfter {
                path,
                anchor,
                elements,
            } => PatchOp::InsertAfter {
                path: path.prefixed(field),
                anchor,
                elements,
            },
        }
    }
}

impl std::fmt::Display for PatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchOp::EnsureDefault { path, value } => write!(f, "ensureDefault {} = {}", path, value),
            PatchOp::SetValue { path, value } => write!(f, "setValue {} = {}", path, value),
            PatchOp::RemoveMatching { path, selector } => {
                write!(f, "removeMatching {}[{}]", path, selector)
            }
            PatchOp::InsertAfter {
                path,
                anchor,
                elements,
            } => write!(
                f,
                "insertAfter {}[{}] ({} elements)",
                path,
                anchor,
                elements.len()
            ),
        }
    }
}

/// Ordered list of operations handed to the document store as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PatchOpList(Vec<PatchOp>);

impl PatchOpList {
    /// Creates an empty list. Applying it is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation.
    pub fn push(&mut self, op: PatchOp) {
        self.0.push(op);
    }

    /// Puts an operation in front of all others.
    pub fn prepend(mut self, op: PatchOp) -> Self {
        self.0.insert(0, op);
        self
    }

    /// Re-roots every operation under `field`.
    pub fn prefix_all(self, field: &str) -> Self {
        Self(self.0.into_iter().map(|op| op.prefixed(field)).collect())
    }

    /// Operations in application order.
    pub fn ops(&self) -> &[PatchOp] {
        &self.0
    }

    /// Iterates operations in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, PatchOp> {
        self.0.iter()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PatchOp>> for PatchOpList {
    fn from(ops: Vec<PatchOp>) -> Self {
        Self(ops)
    }
}

impl FromIterator<PatchOp> for PatchOpList {
    fn from_iter<I: IntoIterator<Item = PatchOp>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<PatchOp> for PatchOpList {
    fn extend<I: IntoIterator<Item = PatchOp>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for PatchOpList {
    type Item = PatchOp;
    type IntoIter = std::vec::IntoIter<PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchOpList {
    type Item = &'a PatchOp;
    type IntoIter = std::slice::Iter<'a, PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_display() {
        assert!(AttributePath::root().is_root());
        assert!(!AttributePath::attribute("board").is_root());
        assert_eq!(AttributePath::root().to_string(), "(root)");
        assert_eq!(AttributePath::attribute("board").to_string(), "board");
        assert_eq!(
            AttributePath::attribute("title").prefixed("chess").to_string(),
            "chess.title"
        );
    }

    #[test]
    fn test_selector_matches_string_field_only() {
        let selector = Selector::position(&"e4".into());
        assert!(selector.matches(&json!({"position": "e4", "piece": "P"})));
        assert!(!selector.matches(&json!({"position": "e5", "piece": "P"})));
        assert!(!selector.matches(&json!({"piece": "P"})));
        assert!(!selector.matches(&json!("e4")));
    }

    #[test]
    fn test_anchor_wire_form() {
        let op = PatchOp::InsertAfter {
            path: AttributePath::attribute("board"),
            anchor: Anchor::Last,
            elements: vec![json!({"position": "e4", "piece": "P"})],
        };
        let wire = serde_json::to_value(&op).expect("serialize");
        assert_eq!(wire["op"], "insertAfter");
        assert_eq!(wire["anchor"], -1);
        assert_eq!(wire["path"], json!(["board"]));

        let back: PatchOp = serde_json::from_value(wire).expect("deserialize");
        assert_eq!(back, op);
    }

    #[test]
    fn test_anchor_rejects_other_negatives() {
        assert_eq!(Anchor::try_from(-1), Ok(Anchor::Last));
        assert_eq!(Anchor::try_from(3), Ok(Anchor::Index(3)));
        assert!(Anchor::try_from(-2).is_err());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_anchor_index_beyond_wire_range_fails_to_serialize() {
        let huge = Anchor::Index(usize::MAX);
        assert!(i64::try_from(huge).is_err());
        assert!(serde_json::to_value(huge).is_err());
        assert_eq!(huge.to_string(), usize::MAX.to_string());
        assert_eq!(serde_json::to_value(Anchor::Index(7)).expect("serialize"), json!(7));
    }

    #[test]
    fn test_prefix_all_keeps_order() {
        let list = PatchOpList::from(vec![
            PatchOp::SetValue {
                path: AttributePath::root(),
                value: json!("Opening"),
            },
            PatchOp::RemoveMatching {
                path: AttributePath::attribute("tags"),
                selector: Selector::new("name", "old"),
            },
        ])
        .prefix_all("title");

        let paths: Vec<String> = list.iter().map(|op| op.path().to_string()).collect();
        assert_eq!(paths, vec!["title", "title.tags"]);
        assert_eq!(list.ops()[0].name(), "setValue");
        assert_eq!(list.ops()[1].name(), "removeMatching");
    }

    #[test]
    fn test_prepend_goes_first() {
        let list = PatchOpList::from(vec![PatchOp::SetValue {
            path: AttributePath::attribute("title"),
            value: json!("x"),
        }])
        .prepend(PatchOp::EnsureDefault {
            path: AttributePath::attribute("_type"),
            value: json!("chessBoard"),
        });
        assert_eq!(list.len(), 2);
        assert_eq!(list.ops()[0].name(), "ensureDefault");
    }
}
