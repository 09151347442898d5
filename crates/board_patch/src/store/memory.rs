//! In-memory JSON document.

use super::{DocumentStore, StoreError, value_kind};
use crate::board::Board;
use crate::patch::{Anchor, AttributePath, Selector};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// A JSON document held in memory. A `null` root is an absent document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    root: Value,
}

impl MemoryDocument {
    /// Creates an absent (null) document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Returns the whole document.
    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Consumes the document, returning its JSON value.
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Looks up the value at `path` without creating anything.
    pub fn lookup(&self, path: &AttributePath) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn lookup_mut(&mut self, path: &AttributePath) -> Option<&mut Value> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = current.as_object_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    /// Object that holds the last segment of `path`, creating missing parents.
    fn parent_mut(&mut self, path: &AttributePath) -> Result<&mut Map<String, Value>, StoreError> {
        let segments = path.segments();
        let parents = &segments[..segments.len().saturating_sub(1)];
        let mut current = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            current = object_at(current, &parents[..depth])?
                .entry(segment.clone())
                .or_insert(Value::Null);
        }
        object_at(current, parents)
    }
}

/// Treats `value` as an object, turning `null` into an empty one.
fn object_at<'a>(
    value: &'a mut Value,
    at: &[String],
) -> Result<&'a mut Map<String, Value>, StoreError> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    let kind = value_kind(value);
    value.as_object_mut().ok_or_else(|| {
        StoreError::NotAnObject(at.iter().cloned().collect(), kind.to_string())
    })
}

impl DocumentStore for MemoryDocument {
    type Error = StoreError;

    #[instrument(skip(self, value), fields(%path))]
    fn ensure_default(&mut self, path: &AttributePath, value: &Value) -> Result<(), StoreError> {
        let Some(last) = path.segments().last() else {
            if self.root.is_null() {
                self.root = value.clone();
            }
            return Ok(());
        };
        let parent = self.parent_mut(path)?;
        if matches!(parent.get(last), None | Some(Value::Null)) {
            debug!("Installing default");
            parent.insert(last.clone(), value.clone());
        } else {
            debug!("Already present");
        }
        Ok(())
    }

    #[instrument(skip(self, value), fields(%path))]
    fn set_value(&mut self, path: &AttributePath, value: &Value) -> Result<(), StoreError> {
        let Some(last) = path.segments().last() else {
            self.root = value.clone();
            return Ok(());
        };
        self.parent_mut(path)?.insert(last.clone(), value.clone());
        Ok(())
    }

    #[instrument(skip(self), fields(%path, %selector))]
    fn remove_matching(
        &mut self,
        path: &AttributePath,
        selector: &Selector,
    ) -> Result<usize, StoreError> {
        match self.lookup_mut(path) {
            None | Some(Value::Null) => Ok(0),
            Some(Value::Array(items)) => {
                let before = items.len();
                items.retain(|item| !selector.matches(item));
                let removed = before - items.len();
                if removed > 1 {
                    warn!(removed, "Selector matched several elements; duplicates cleaned up");
                }
                Ok(removed)
            }
            Some(_) => Err(StoreError::NotACollection(path.clone())),
        }
    }

    #[instrument(skip(self, elements), fields(%path, %anchor, count = elements.len()))]
    fn insert_after(
        &mut self,
        path: &AttributePath,
        anchor: Anchor,
        elements: &[Value],
    ) -> Result<(), StoreError> {
        let items = match self.lookup_mut(path) {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Err(StoreError::MissingCollection(path.clone())),
            Some(_) => return Err(StoreError::NotACollection(path.clone())),
        };
        let at = match anchor {
            Anchor::Last => items.len(),
            Anchor::Index(index) if index < items.len() => index + 1,
            Anchor::Index(index) => {
                return Err(StoreError::AnchorOutOfRange(
                    path.clone(),
                    index,
                    items.len(),
                ));
            }
        };
        items.splice(at..at, elements.iter().cloned());
        Ok(())
    }

    fn contains(&self, path: &AttributePath) -> Result<bool, StoreError> {
        Ok(self.lookup(path).is_some_and(|value| !value.is_null()))
    }

    fn read_board(&self, path: &AttributePath) -> Result<Option<Board>, StoreError> {
        match self.lookup(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Board::from_document(Some(value)).map(Some),
        }
    }
}
