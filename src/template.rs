use crate::statics;
use crate::value::JsonValue;
use anyhow::Context as _;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Object,
    Array,
}

impl TemplateKind {
    fn of(value: &JsonValue) -> Option<TemplateKind> {
        match value {
            JsonValue::Object(_) => Some(TemplateKind::Object),
            JsonValue::Array(_) => Some(TemplateKind::Array),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Object => statics::TPL_KIND_OBJECT,
            TemplateKind::Array => statics::TPL_KIND_ARRAY,
        }
    }
}

/// A named container value that can be inserted when adding keys or rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub kind: TemplateKind,
    pub value: JsonValue,
    pub builtin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template name cannot be empty")]
    EmptyName,
    #[error("{0:?} is a built-in template")]
    Builtin(String),
    #[error("a template named {0:?} already exists")]
    DuplicateName(String),
    #[error("no template named {0:?}")]
    Missing(String),
    #[error("template values must be objects or arrays")]
    NotAContainer,
    #[error("could not parse template JSON: {0}")]
    Parse(String),
    #[error("template imports must be a JSON array of records")]
    NotAnArray,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// The template library: two fixed builtins plus user entries.
#[derive(Debug)]
pub struct TemplateStore {
    templates: Vec<Template>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        TemplateStore {
            templates: vec![
                Template {
                    name: statics::TPL_EMPTY_OBJECT.to_string(),
                    kind: TemplateKind::Object,
                    value: JsonValue::Object(IndexMap::new()),
                    builtin: true,
                },
                Template {
                    name: statics::TPL_EMPTY_ARRAY.to_string(),
                    kind: TemplateKind::Array,
                    value: JsonValue::Array(Vec::new()),
                    builtin: true,
                },
            ],
        }
    }
}

impl TemplateStore {
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn add(&mut self, name: &str, value: JsonValue) -> Result<(), TemplateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        let Some(kind) = TemplateKind::of(&value) else {
            return Err(TemplateError::NotAContainer);
        };
        if let Some(existing) = self.get(name) {
            return Err(if existing.builtin {
                TemplateError::Builtin(name.to_string())
            } else {
                TemplateError::DuplicateName(name.to_string())
            });
        }
        self.templates.push(Template {
            name: name.to_string(),
            kind,
            value,
            builtin: false,
        });
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<(), TemplateError> {
        match self.get(name) {
            Some(t) if t.builtin => Err(TemplateError::Builtin(name.to_string())),
            Some(_) => {
                self.templates.retain(|t| t.name != name);
                Ok(())
            }
            None => Err(TemplateError::Missing(name.to_string())),
        }
    }

    /// Merge an exported template array into the store. Records that are
    /// not an object with a non-blank string `name` and a container
    /// `value` are counted as skipped, as are names colliding with a
    /// builtin and repeats within the import (first one wins). A record
    /// matching an existing user template replaces it.
    pub fn import_json(&mut self, text: &str) -> Result<ImportSummary, TemplateError> {
        let parsed =
            JsonValue::parse_str(text).map_err(|e| TemplateError::Parse(format!("{e:#}")))?;
        let Some(records) = parsed.as_array() else {
            return Err(TemplateError::NotAnArray);
        };

        let mut summary = ImportSummary::default();
        let mut seen: Vec<String> = Vec::new();
        for record in records {
            let name = record
                .get(statics::TPL_FIELD_NAME)
                .and_then(JsonValue::as_str)
                .map(str::trim)
                .unwrap_or("");
            let value = record.get(statics::TPL_FIELD_VALUE);
            let kind = value.and_then(TemplateKind::of);
            let (Some(value), Some(kind)) = (value, kind) else {
                summary.skipped += 1;
                continue;
            };
            if name.is_empty()
                || seen.iter().any(|s| s == name)
                || self.get(name).is_some_and(|t| t.builtin)
            {
                summary.skipped += 1;
                continue;
            }
            seen.push(name.to_string());

            let template = Template {
                name: name.to_string(),
                kind,
                value: value.clone(),
                builtin: false,
            };
            match self.templates.iter_mut().find(|t| t.name == name) {
                Some(slot) => *slot = template,
                None => self.templates.push(template),
            }
            summary.imported += 1;
        }
        tracing::debug!(imported = summary.imported, skipped = summary.skipped, "template import");
        Ok(summary)
    }

    /// User templates as the interchange form: an array of
    /// {name, type, value} records.
    pub fn export_json(&self) -> String {
        let records: Vec<JsonValue> = self
            .templates
            .iter()
            .filter(|t| !t.builtin)
            .map(|t| {
                let mut map = IndexMap::new();
                map.insert(
                    statics::TPL_FIELD_NAME.to_string(),
                    JsonValue::String(t.name.clone()),
                );
                map.insert(
                    statics::TPL_FIELD_TYPE.to_string(),
                    JsonValue::String(t.kind.as_str().to_string()),
                );
                map.insert(statics::TPL_FIELD_VALUE.to_string(), t.value.clone());
                JsonValue::Object(map)
            })
            .collect();
        JsonValue::Array(records).to_pretty()
    }

    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<ImportSummary> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        Ok(self.import_json(&text)?)
    }

    pub fn save_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {parent:?}"))?;
        }
        std::fs::write(path, self.export_json()).with_context(|| format!("writing {path:?}"))
    }

    /// Where the library lives between sessions.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(statics::CONFIG_DIR_NAME)
            .join(statics::TEMPLATES_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportSummary, TemplateError, TemplateKind, TemplateStore};
    use crate::value::JsonValue;

    fn parse(text: &str) -> JsonValue {
        JsonValue::parse_str(text).unwrap()
    }

    #[test]
    fn a_fresh_store_has_the_two_builtins() {
        let store = TemplateStore::default();
        let names: Vec<&str> = store.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Empty object", "Empty array"]);
        assert!(store.iter().all(|t| t.builtin));
    }

    #[test]
    fn add_validates_name_and_value() {
        let mut store = TemplateStore::default();
        assert_eq!(store.add("  ", parse("{}")), Err(TemplateError::EmptyName));
        assert_eq!(store.add("x", parse("42")), Err(TemplateError::NotAContainer));
        assert_eq!(
            store.add("Empty object", parse("{}")),
            Err(TemplateError::Builtin("Empty object".to_string()))
        );

        store.add("pair", parse(r#"{"a":1}"#)).unwrap();
        assert_eq!(
            store.add("pair", parse("[]")),
            Err(TemplateError::DuplicateName("pair".to_string()))
        );
        assert_eq!(store.get("pair").unwrap().kind, TemplateKind::Object);
    }

    #[test]
    fn remove_spares_builtins() {
        let mut store = TemplateStore::default();
        store.add("mine", parse("[]")).unwrap();
        store.remove("mine").unwrap();
        assert_eq!(
            store.remove("mine"),
            Err(TemplateError::Missing("mine".to_string()))
        );
        assert_eq!(
            store.remove("Empty array"),
            Err(TemplateError::Builtin("Empty array".to_string()))
        );
    }

    #[test]
    fn import_counts_and_skips_malformed_records() {
        let mut store = TemplateStore::default();
        let summary = store
            .import_json(
                r#"[
                  {"name":"good","type":"object","value":{"a":1}},
                  {"name":"","value":{}},
                  {"name":"noval","type":"array"},
                  {"name":"prim","value":7},
                  {"name":"Empty object","value":{}},
                  {"name":"good","value":[1]},
                  {"name":"second","value":[2]}
                ]"#,
            )
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 5 });
        // The in-file repeat of "good" lost; the first record won.
        assert_eq!(store.get("good").unwrap().kind, TemplateKind::Object);
        assert!(store.get("second").is_some());
    }

    #[test]
    fn import_replaces_existing_user_templates() {
        let mut store = TemplateStore::default();
        store.add("mine", parse(r#"{"old":1}"#)).unwrap();
        store
            .import_json(r#"[{"name":"mine","value":[1,2]}]"#)
            .unwrap();
        let t = store.get("mine").unwrap();
        assert_eq!(t.kind, TemplateKind::Array);
        assert_eq!(t.value, parse("[1,2]"));
    }

    #[test]
    fn import_rejects_non_arrays_and_bad_json() {
        let mut store = TemplateStore::default();
        assert_eq!(store.import_json(r#"{"a":1}"#), Err(TemplateError::NotAnArray));
        assert!(matches!(store.import_json("nope"), Err(TemplateError::Parse(_))));
    }

    #[test]
    fn export_then_import_round_trips_user_templates() {
        let mut store = TemplateStore::default();
        store.add("one", parse(r#"{"a":1}"#)).unwrap();
        store.add("two", parse("[true]")).unwrap();

        let mut other = TemplateStore::default();
        let summary = other.import_json(&store.export_json()).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 0 });
        assert_eq!(other.get("one").unwrap().value, parse(r#"{"a":1}"#));
        assert_eq!(other.get("two").unwrap().kind, TemplateKind::Array);
    }

    #[test]
    fn files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");

        let mut store = TemplateStore::default();
        store.add("disk", parse(r#"{"x":[1]}"#)).unwrap();
        store.save_file(&path).unwrap();

        let mut loaded = TemplateStore::default();
        loaded.load_file(&path).unwrap();
        assert_eq!(loaded.get("disk").unwrap().value, parse(r#"{"x":[1]}"#));
    }
}
