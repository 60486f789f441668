use crate::coerce::coerce;
use crate::path::JsonPath;
use crate::value::JsonValue;
use anyhow::Context as _;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("could not parse JSON: {0}")]
    Parse(String),
    #[error("no document loaded")]
    NoDocument,
    #[error("path '{0}' does not resolve")]
    PathNotFound(JsonPath),
    #[error("path '{0}' cannot hold values")]
    InvalidParent(JsonPath),
    #[error("index {index} is out of range for an array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("key {0:?} is not present")]
    KeyMissing(String),
    #[error("key {0:?} already exists")]
    KeyExists(String),
    #[error("{0}")]
    StructuralConstraint(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Blank input: the editor goes back to its empty state, not an error.
    Empty,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// The new name equals the old one; nothing was touched.
    Unchanged,
}

/// What a value write did. `reshaped` is set when the write created a key
/// or swapped a primitive for a container (or back), meaning views must
/// rebuild instead of patching the one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcome {
    pub old: Option<JsonValue>,
    pub new: JsonValue,
    pub reshaped: bool,
}

/// The JSON document plus its load-time baseline. All mutation goes
/// through the methods here; views only ever read. Every mutating method
/// either applies completely or returns an error leaving the tree as it
/// was.
#[derive(Debug, Default)]
pub struct Document {
    pub source_path: Option<PathBuf>,
    pub dirty: bool,
    root: Option<JsonValue>,
    snapshot: Option<JsonValue>,
    baseline_text: Option<String>,
}

impl Document {
    pub fn root(&self) -> Option<&JsonValue> {
        self.root.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.root.is_some()
    }

    pub fn value_at(&self, path: &JsonPath) -> Option<&JsonValue> {
        path.resolve(self.root.as_ref()?)
    }

    fn clear(&mut self) {
        self.source_path = None;
        self.dirty = false;
        self.root = None;
        self.snapshot = None;
        self.baseline_text = None;
    }

    fn install(&mut self, root: JsonValue) {
        self.snapshot = Some(root.clone());
        self.baseline_text = Some(root.to_pretty());
        self.root = Some(root);
        self.dirty = false;
    }

    /// Replace the document with parsed text. Blank text clears the
    /// editor; a parse failure also clears it and reports why.
    pub fn load_text(&mut self, text: &str) -> Result<LoadOutcome, DocumentError> {
        self.clear();
        if text.trim().is_empty() {
            return Ok(LoadOutcome::Empty);
        }
        let root = JsonValue::parse_str(text)
            .map_err(|e| DocumentError::Parse(format!("{e:#}")))?;
        self.install(root);
        Ok(LoadOutcome::Loaded)
    }

    /// Replace the document with an already-built value (CSV import).
    pub fn load_value(&mut self, root: JsonValue) {
        self.clear();
        self.install(root);
    }

    pub fn load_path(&mut self, path: &Path) -> anyhow::Result<LoadOutcome> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        let outcome = self.load_text(&text)?;
        if outcome == LoadOutcome::Loaded {
            self.source_path = Some(path.to_path_buf());
        }
        tracing::debug!(path = %path.display(), ?outcome, "loaded document");
        Ok(outcome)
    }

    /// Write the document out pretty-printed and make that the new dirty
    /// baseline. The load-time snapshot is kept; the diff view keeps
    /// comparing against what was originally opened.
    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let Some(root) = self.root.as_ref() else {
            anyhow::bail!("no document loaded");
        };
        let text = root.to_pretty();
        std::fs::write(path, &text).with_context(|| format!("writing {path:?}"))?;
        self.baseline_text = Some(text);
        self.source_path = Some(path.to_path_buf());
        self.dirty = false;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }

    pub fn to_pretty_text(&self) -> Option<String> {
        Some(self.root.as_ref()?.to_pretty())
    }

    /// Load-time and current serializations, both in original key order.
    pub fn diff_sides(&self) -> Option<(String, String)> {
        let before = self.snapshot.as_ref()?.to_pretty();
        let after = self.root.as_ref()?.to_pretty();
        Some((before, after))
    }

    fn refresh_dirty(&mut self) {
        self.dirty = match (&self.root, &self.baseline_text) {
            (Some(root), Some(baseline)) => root.to_pretty() != *baseline,
            _ => false,
        };
    }

    /// Coerce `raw` and write it at `path`. Writing to a missing key of an
    /// existing object creates it at the end; everything else must already
    /// resolve. The root itself can only be replaced while it is a
    /// primitive.
    pub fn set_value_at_path(
        &mut self,
        path: &JsonPath,
        raw: &str,
    ) -> Result<SetOutcome, DocumentError> {
        let root = self.root.as_mut().ok_or(DocumentError::NoDocument)?;

        let outcome = match path.split_last() {
            None => {
                if root.is_container() {
                    return Err(DocumentError::InvalidParent(JsonPath::root()));
                }
                let old = root.clone();
                let new = coerce(raw, &old);
                *root = new.clone();
                SetOutcome { old: Some(old), new, reshaped: false }
            }
            Some((parent_path, last)) => {
                let parent = parent_path
                    .resolve_mut(root)
                    .ok_or_else(|| DocumentError::PathNotFound(parent_path.clone()))?;
                match parent {
                    JsonValue::Object(map) => {
                        let key = last.object_key().into_owned();
                        match map.get_mut(&key) {
                            Some(slot) => {
                                let old = slot.clone();
                                let new = coerce(raw, &old);
                                let reshaped = old.is_container() != new.is_container();
                                *slot = new.clone();
                                SetOutcome { old: Some(old), new, reshaped }
                            }
                            None => {
                                let new = coerce(raw, &JsonValue::Null);
                                map.insert(key, new.clone());
                                SetOutcome { old: None, new, reshaped: true }
                            }
                        }
                    }
                    JsonValue::Array(values) => {
                        let index = last
                            .array_index()
                            .ok_or_else(|| DocumentError::PathNotFound(path.clone()))?;
                        let len = values.len();
                        let slot = values
                            .get_mut(index)
                            .ok_or(DocumentError::IndexOutOfRange { index, len })?;
                        let old = slot.clone();
                        let new = coerce(raw, &old);
                        let reshaped = old.is_container() != new.is_container();
                        *slot = new.clone();
                        SetOutcome { old: Some(old), new, reshaped }
                    }
                    _ => return Err(DocumentError::InvalidParent(parent_path)),
                }
            }
        };

        self.refresh_dirty();
        tracing::debug!(path = %path, new = %outcome.new.preview(), "set value");
        Ok(outcome)
    }

    /// Rename the object key addressed by `path`, keeping its position.
    pub fn rename_key_at_path(
        &mut self,
        path: &JsonPath,
        new_key: &str,
    ) -> Result<RenameOutcome, DocumentError> {
        let root = self.root.as_mut().ok_or(DocumentError::NoDocument)?;
        let Some((parent_path, last)) = path.split_last() else {
            return Err(DocumentError::StructuralConstraint(
                "the document root has no key to rename".to_string(),
            ));
        };
        let old_key = last.object_key().into_owned();
        let parent = parent_path
            .resolve_mut(root)
            .ok_or_else(|| DocumentError::PathNotFound(parent_path.clone()))?;
        let Some(map) = parent.as_object_mut() else {
            return Err(DocumentError::StructuralConstraint(format!(
                "'{}' is not an object",
                parent_path.label()
            )));
        };
        if !map.contains_key(&old_key) {
            return Err(DocumentError::KeyMissing(old_key));
        }
        if new_key == old_key {
            return Ok(RenameOutcome::Unchanged);
        }
        if map.contains_key(new_key) {
            return Err(DocumentError::KeyExists(new_key.to_string()));
        }
        rename_in_place(map, &old_key, new_key);
        self.refresh_dirty();
        tracing::debug!(path = %path, new_key, "renamed key");
        Ok(RenameOutcome::Renamed)
    }

    fn array_at_mut(
        &mut self,
        path: &JsonPath,
    ) -> Result<&mut Vec<JsonValue>, DocumentError> {
        let root = self.root.as_mut().ok_or(DocumentError::NoDocument)?;
        let target = path
            .resolve_mut(root)
            .ok_or_else(|| DocumentError::PathNotFound(path.clone()))?;
        let type_name = target.type_name();
        target.as_array_mut().ok_or_else(|| {
            DocumentError::StructuralConstraint(format!(
                "'{}' is {}, not an array",
                path.label(),
                type_name
            ))
        })
    }

    fn object_at_mut(
        &mut self,
        path: &JsonPath,
    ) -> Result<&mut IndexMap<String, JsonValue>, DocumentError> {
        let root = self.root.as_mut().ok_or(DocumentError::NoDocument)?;
        let target = path
            .resolve_mut(root)
            .ok_or_else(|| DocumentError::PathNotFound(path.clone()))?;
        let type_name = target.type_name();
        target.as_object_mut().ok_or_else(|| {
            DocumentError::StructuralConstraint(format!(
                "'{}' is {}, not an object",
                path.label(),
                type_name
            ))
        })
    }

    /// Insert `value` before `index` in the array at `array_path`; an
    /// index equal to the length appends.
    pub fn insert_element(
        &mut self,
        array_path: &JsonPath,
        index: usize,
        value: JsonValue,
    ) -> Result<(), DocumentError> {
        let values = self.array_at_mut(array_path)?;
        let len = values.len();
        if index > len {
            return Err(DocumentError::IndexOutOfRange { index, len });
        }
        values.insert(index, value);
        self.refresh_dirty();
        Ok(())
    }

    pub fn remove_element(
        &mut self,
        array_path: &JsonPath,
        index: usize,
    ) -> Result<JsonValue, DocumentError> {
        let values = self.array_at_mut(array_path)?;
        let len = values.len();
        if index >= len {
            return Err(DocumentError::IndexOutOfRange { index, len });
        }
        let removed = values.remove(index);
        self.refresh_dirty();
        Ok(removed)
    }

    pub fn move_element(
        &mut self,
        array_path: &JsonPath,
        from: usize,
        to: usize,
    ) -> Result<(), DocumentError> {
        let values = self.array_at_mut(array_path)?;
        let len = values.len();
        if from >= len {
            return Err(DocumentError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(DocumentError::IndexOutOfRange { index: to, len });
        }
        if from != to {
            let value = values.remove(from);
            values.insert(to, value);
            self.refresh_dirty();
        }
        Ok(())
    }

    /// Add `key` at the end of the object at `object_path`.
    pub fn insert_key(
        &mut self,
        object_path: &JsonPath,
        key: &str,
        value: JsonValue,
    ) -> Result<(), DocumentError> {
        let map = self.object_at_mut(object_path)?;
        if map.contains_key(key) {
            return Err(DocumentError::KeyExists(key.to_string()));
        }
        map.insert(key.to_string(), value);
        self.refresh_dirty();
        Ok(())
    }

    pub fn remove_key(
        &mut self,
        object_path: &JsonPath,
        key: &str,
    ) -> Result<JsonValue, DocumentError> {
        let map = self.object_at_mut(object_path)?;
        let Some(removed) = map.shift_remove(key) else {
            return Err(DocumentError::KeyMissing(key.to_string()));
        };
        self.refresh_dirty();
        Ok(removed)
    }

    /// Add a null-valued column to every row of the array of objects at
    /// `array_path`. Checks run over all rows before anything changes.
    pub fn add_column(
        &mut self,
        array_path: &JsonPath,
        name: &str,
    ) -> Result<(), DocumentError> {
        let rows = self.row_objects_mut(array_path)?;
        if rows.iter().any(|row| row.contains_key(name)) {
            return Err(DocumentError::KeyExists(name.to_string()));
        }
        for row in rows {
            row.insert(name.to_string(), JsonValue::Null);
        }
        self.refresh_dirty();
        Ok(())
    }

    pub fn remove_column(
        &mut self,
        array_path: &JsonPath,
        name: &str,
    ) -> Result<(), DocumentError> {
        let rows = self.row_objects_mut(array_path)?;
        if !rows.iter().any(|row| row.contains_key(name)) {
            return Err(DocumentError::KeyMissing(name.to_string()));
        }
        for row in rows {
            row.shift_remove(name);
        }
        self.refresh_dirty();
        Ok(())
    }

    pub fn rename_column(
        &mut self,
        array_path: &JsonPath,
        old_name: &str,
        new_name: &str,
    ) -> Result<RenameOutcome, DocumentError> {
        let rows = self.row_objects_mut(array_path)?;
        if !rows.iter().any(|row| row.contains_key(old_name)) {
            return Err(DocumentError::KeyMissing(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(RenameOutcome::Unchanged);
        }
        if rows.iter().any(|row| row.contains_key(new_name)) {
            return Err(DocumentError::KeyExists(new_name.to_string()));
        }
        for row in rows {
            if row.contains_key(old_name) {
                rename_in_place(row, old_name, new_name);
            }
        }
        self.refresh_dirty();
        Ok(RenameOutcome::Renamed)
    }

    fn row_objects_mut(
        &mut self,
        array_path: &JsonPath,
    ) -> Result<Vec<&mut IndexMap<String, JsonValue>>, DocumentError> {
        let label = array_path.label();
        let values = self.array_at_mut(array_path)?;
        if !values.iter().all(|v| v.as_object().is_some()) {
            return Err(DocumentError::StructuralConstraint(format!(
                "'{label}' is not an array of objects"
            )));
        }
        Ok(values
            .iter_mut()
            .filter_map(JsonValue::as_object_mut)
            .collect())
    }
}

/// Swap one key for another without disturbing entry order.
fn rename_in_place(map: &mut IndexMap<String, JsonValue>, old_key: &str, new_key: &str) {
    let renamed: IndexMap<String, JsonValue> = map
        .drain(..)
        .map(|(k, v)| {
            if k == old_key {
                (new_key.to_string(), v)
            } else {
                (k, v)
            }
        })
        .collect();
    *map = renamed;
}
