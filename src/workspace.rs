use crate::csv_bridge::{self, CsvError};
use crate::diff::{self, DiffReport};
use crate::document::{Document, DocumentError, LoadOutcome, RenameOutcome, SetOutcome};
use crate::history::{HistoryStack, NavDirection};
use crate::path::JsonPath;
use crate::statics;
use crate::table::{self, TableKind, TableModel};
use crate::template::{TemplateError, TemplateStore};
use crate::tree::{self, TreeRow};
use crate::value::JsonValue;
use anyhow::Context as _;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::path::Path;

/// Result of importing CSV as the working document. Table-shaped CSVs
/// load only their first row; the count of what was left behind is
/// surfaced so the caller can warn about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvLoadOutcome {
    pub discarded_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub path: JsonPath,
    pub outcome: SetOutcome,
}

/// Everything one editing session holds: the document, the view
/// projections derived from it, navigation history, and the template
/// library. The views here are read models; every change to the JSON
/// itself funnels through the [`Document`] methods and is followed by a
/// projection refresh.
#[derive(Debug, Default)]
pub struct Workspace {
    pub templates: TemplateStore,
    doc: Document,
    history: HistoryStack,
    table_path: JsonPath,
    table: Option<TableModel>,
    tree_rows: Vec<TreeRow>,
    expanded: BTreeSet<JsonPath>,
}

impl Workspace {
    pub fn has_document(&self) -> bool {
        self.doc.has_document()
    }

    pub fn dirty(&self) -> bool {
        self.doc.dirty
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.doc.source_path.as_deref()
    }

    pub fn table(&self) -> Option<&TableModel> {
        self.table.as_ref()
    }

    pub fn table_path(&self) -> &JsonPath {
        &self.table_path
    }

    pub fn tree_rows(&self) -> &[TreeRow] {
        &self.tree_rows
    }

    pub fn value_at(&self, path: &JsonPath) -> Option<&JsonValue> {
        self.doc.value_at(path)
    }

    pub fn can_navigate(&self, direction: NavDirection) -> bool {
        self.history.can_step(direction)
    }

    pub fn history_position(&self) -> Option<(usize, usize)> {
        self.history.position()
    }

    pub fn load_json_text(&mut self, text: &str) -> Result<LoadOutcome, DocumentError> {
        let outcome = self.doc.load_text(text);
        self.after_load();
        outcome
    }

    pub fn load_json_path(&mut self, path: &Path) -> anyhow::Result<LoadOutcome> {
        let outcome = self.doc.load_path(path);
        self.after_load();
        outcome
    }

    pub fn save_json_path(&mut self, path: &Path) -> anyhow::Result<()> {
        self.doc.save_to_path(path)
    }

    pub fn load_csv_text(&mut self, text: &str) -> Result<CsvLoadOutcome, CsvError> {
        let value = csv_bridge::csv_to_json(text)?;
        let (value, discarded_rows) = match value {
            JsonValue::Array(mut rows) if !rows.is_empty() => {
                let discarded = rows.len() - 1;
                (rows.swap_remove(0), discarded)
            }
            other => (other, 0),
        };
        self.doc.load_value(value);
        self.after_load();
        Ok(CsvLoadOutcome { discarded_rows })
    }

    pub fn load_csv_path(&mut self, path: &Path) -> anyhow::Result<CsvLoadOutcome> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        Ok(self.load_csv_text(&text)?)
    }

    pub fn export_csv_path(&self, path: &Path) -> anyhow::Result<()> {
        let Some(root) = self.doc.root() else {
            anyhow::bail!("no document loaded");
        };
        let csv = csv_bridge::json_to_csv(root)?;
        std::fs::write(path, csv).with_context(|| format!("writing {path:?}"))
    }

    pub fn diff_report(&self) -> Option<DiffReport> {
        let (before, after) = self.doc.diff_sides()?;
        Some(diff::line_diff(&before, &after))
    }

    /// Write edited text into the cell at (row, col) of the current
    /// table. Containers rebuild every projection; primitive-for-
    /// primitive swaps just refresh the table and touch up the one tree
    /// row.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: usize,
        raw: &str,
    ) -> Result<CellEdit, DocumentError> {
        let table = self.current_table()?;
        let Some(cell) = table.cell(row, col) else {
            return Err(DocumentError::StructuralConstraint(no_such_cell(row, col)));
        };
        let path = match (&cell.path, cell.editable) {
            (Some(path), true) => path.clone(),
            _ => {
                return Err(DocumentError::StructuralConstraint(
                    statics::EN_ERR_CELL_READ_ONLY.to_string(),
                ));
            }
        };

        let outcome = self.doc.set_value_at_path(&path, raw)?;
        if outcome.reshaped {
            self.rebuild_projections();
        } else {
            self.patch_after_set(&path);
        }
        Ok(CellEdit { path, outcome })
    }

    /// Append a row (or array item) to the focused array.
    pub fn add_row(&mut self) -> Result<(), DocumentError> {
        let table = self.current_table()?;
        let at = table.rows.len();
        self.insert_row(at)
    }

    /// Insert a blank row before `at`. In the rows layout the new row is
    /// an object carrying every current column as null.
    pub fn insert_row(&mut self, at: usize) -> Result<(), DocumentError> {
        let table = self.current_table()?;
        let value = match table.kind {
            TableKind::Rows => {
                let mut map = IndexMap::new();
                for header in &table.headers {
                    map.insert(header.clone(), JsonValue::Null);
                }
                JsonValue::Object(map)
            }
            TableKind::IndexValue => JsonValue::Null,
            _ => return Err(not_an_array_view(table.kind)),
        };
        let path = self.table_path.clone();
        self.doc.insert_element(&path, at, value)?;
        self.rebuild_projections();
        Ok(())
    }

    pub fn delete_row(&mut self, row: usize) -> Result<(), DocumentError> {
        let table = self.current_table()?;
        if !matches!(table.kind, TableKind::Rows | TableKind::IndexValue) {
            return Err(not_an_array_view(table.kind));
        }
        let path = self.table_path.clone();
        self.doc.remove_element(&path, row)?;
        self.rebuild_projections();
        Ok(())
    }

    pub fn move_row(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        let table = self.current_table()?;
        if !matches!(table.kind, TableKind::Rows | TableKind::IndexValue) {
            return Err(not_an_array_view(table.kind));
        }
        let path = self.table_path.clone();
        self.doc.move_element(&path, from, to)?;
        self.rebuild_projections();
        Ok(())
    }

    /// Add `name` to the focused object with an initial value (usually a
    /// template's).
    pub fn add_key(&mut self, name: &str, value: JsonValue) -> Result<(), DocumentError> {
        self.require_kind(TableKind::KeyValue)?;
        let path = self.table_path.clone();
        self.doc.insert_key(&path, name, value)?;
        self.rebuild_projections();
        Ok(())
    }

    pub fn delete_key(&mut self, row: usize) -> Result<(), DocumentError> {
        self.require_kind(TableKind::KeyValue)?;
        let key = self.row_key(row)?;
        let path = self.table_path.clone();
        self.doc.remove_key(&path, &key)?;
        self.rebuild_projections();
        Ok(())
    }

    pub fn rename_key(
        &mut self,
        row: usize,
        new_key: &str,
    ) -> Result<RenameOutcome, DocumentError> {
        self.require_kind(TableKind::KeyValue)?;
        let table = self.current_table()?;
        let Some(path) = table.cell_path(row, 1).cloned() else {
            return Err(DocumentError::StructuralConstraint(no_such_cell(row, 1)));
        };

        let outcome = self.doc.rename_key_at_path(&path, new_key)?;
        if outcome == RenameOutcome::Renamed
            && let Some((parent, _)) = path.split_last()
        {
            self.rekey_prefix(&path, &parent.child_key(new_key));
        }
        self.rebuild_projections();
        Ok(outcome)
    }

    pub fn add_column(&mut self, name: &str) -> Result<(), DocumentError> {
        self.require_kind(TableKind::Rows)?;
        let path = self.table_path.clone();
        self.doc.add_column(&path, name)?;
        self.rebuild_projections();
        Ok(())
    }

    pub fn delete_column(&mut self, col: usize) -> Result<(), DocumentError> {
        self.require_kind(TableKind::Rows)?;
        let name = self.column_name(col)?;
        let path = self.table_path.clone();
        self.doc.remove_column(&path, &name)?;
        self.rebuild_projections();
        Ok(())
    }

    pub fn rename_column(
        &mut self,
        col: usize,
        new_name: &str,
    ) -> Result<RenameOutcome, DocumentError> {
        self.require_kind(TableKind::Rows)?;
        let old_name = self.column_name(col)?;
        let path = self.table_path.clone();
        let outcome = self.doc.rename_column(&path, &old_name, new_name)?;
        self.rebuild_projections();
        Ok(outcome)
    }

    /// Focus the table on `path` and remember where we came from.
    pub fn drill(&mut self, path: JsonPath) -> Result<(), DocumentError> {
        let root = self.doc.root().ok_or(DocumentError::NoDocument)?;
        if path.resolve(root).is_none() {
            return Err(DocumentError::PathNotFound(path));
        }
        self.table_path = path;
        self.rebuild_projections();
        Ok(())
    }

    /// Step through history. A target that no longer resolves (its
    /// container was edited away) reports the failure and leaves the
    /// cursor where it was.
    pub fn navigate(
        &mut self,
        direction: NavDirection,
    ) -> Result<Option<JsonPath>, DocumentError> {
        let Some(target) = self.history.peek(direction).cloned() else {
            return Ok(None);
        };
        let root = self.doc.root().ok_or(DocumentError::NoDocument)?;
        if target.resolve(root).is_none() {
            return Err(DocumentError::PathNotFound(target));
        }

        self.history.step(direction);
        self.table_path = target.clone();
        self.history.set_navigating(true);
        self.rebuild_projections();
        self.history.set_navigating(false);
        Ok(Some(target))
    }

    pub fn toggle_expanded(&mut self, path: &JsonPath) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.clone());
        }
        if let Some(root) = self.doc.root() {
            self.tree_rows = tree::project(root, &self.expanded);
        }
    }

    /// Save the focused value into the template library under `name`.
    pub fn capture_template(&mut self, name: &str) -> Result<(), TemplateError> {
        let value = self
            .doc
            .value_at(&self.table_path)
            .cloned()
            .unwrap_or(JsonValue::Null);
        self.templates.add(name, value)
    }

    fn after_load(&mut self) {
        self.history.clear();
        self.table_path = JsonPath::root();
        self.expanded = BTreeSet::from([JsonPath::root()]);
        self.rebuild_projections();
    }

    fn rebuild_projections(&mut self) {
        let Some(root) = self.doc.root() else {
            self.table = None;
            self.tree_rows.clear();
            return;
        };
        let value = match self.table_path.resolve(root) {
            Some(value) => value,
            None => {
                // The focused path was edited away; fall back to the root.
                self.table_path = JsonPath::root();
                root
            }
        };
        self.table = Some(table::project(value, &self.table_path));
        self.tree_rows = tree::project(root, &self.expanded);
        self.history.record(self.table_path.clone());
    }

    fn patch_after_set(&mut self, path: &JsonPath) {
        let Some(root) = self.doc.root() else { return };
        if let Some(value) = self.table_path.resolve(root) {
            self.table = Some(table::project(value, &self.table_path));
        }
        if let Some(row) = self.tree_rows.iter_mut().find(|r| r.path == *path)
            && let Some(value) = path.resolve(root)
        {
            row.preview = value.preview();
        }
    }

    fn rekey_prefix(&mut self, old: &JsonPath, new: &JsonPath) {
        let expanded = std::mem::take(&mut self.expanded);
        self.expanded = expanded
            .into_iter()
            .map(|p| p.reparent(old, new).unwrap_or(p))
            .collect();
        if let Some(p) = self.table_path.reparent(old, new) {
            self.table_path = p;
        }
    }

    fn current_table(&self) -> Result<&TableModel, DocumentError> {
        self.table.as_ref().ok_or(DocumentError::NoDocument)
    }

    fn require_kind(&self, kind: TableKind) -> Result<(), DocumentError> {
        let table = self.current_table()?;
        if table.kind == kind {
            Ok(())
        } else {
            Err(DocumentError::StructuralConstraint(format!(
                "this view does not support that operation ({:?} layout)",
                table.kind
            )))
        }
    }

    fn row_key(&self, row: usize) -> Result<String, DocumentError> {
        let table = self.current_table()?;
        table
            .cell(row, 0)
            .map(|cell| cell.text.clone())
            .ok_or_else(|| DocumentError::StructuralConstraint(no_such_cell(row, 0)))
    }

    fn column_name(&self, col: usize) -> Result<String, DocumentError> {
        let table = self.current_table()?;
        table
            .headers
            .get(col)
            .cloned()
            .ok_or_else(|| {
                DocumentError::StructuralConstraint(format!("no column {col} in this view"))
            })
    }
}

fn no_such_cell(row: usize, col: usize) -> String {
    format!("no cell at row {row}, column {col}")
}

fn not_an_array_view(kind: TableKind) -> DocumentError {
    DocumentError::StructuralConstraint(format!(
        "this view does not show array elements ({kind:?} layout)"
    ))
}

#[cfg(test)]
mod tests {
    use super::Workspace;
    use crate::document::DocumentError;
    use crate::history::NavDirection;
    use crate::path::JsonPath;
    use crate::table::TableKind;
    use crate::value::JsonValue;
    use pretty_assertions::assert_eq;

    fn ws(text: &str) -> Workspace {
        let mut ws = Workspace::default();
        ws.load_json_text(text).unwrap();
        ws
    }

    fn p(text: &str) -> JsonPath {
        JsonPath::parse(text)
    }

    #[test]
    fn loading_builds_projections_and_seeds_history() {
        let ws = ws(r#"{"a":{"b":1}}"#);
        assert!(ws.has_document());
        assert_eq!(ws.table().unwrap().kind, TableKind::KeyValue);
        assert_eq!(ws.tree_rows().len(), 2);
        assert_eq!(ws.history_position(), Some((1, 1)));
        assert!(!ws.can_navigate(NavDirection::Back));
    }

    #[test]
    fn failed_loads_leave_an_empty_workspace() {
        let mut ws = ws(r#"{"a":1}"#);
        assert!(ws.load_json_text("broken{").is_err());
        assert!(!ws.has_document());
        assert!(ws.table().is_none());
        assert!(ws.tree_rows().is_empty());
    }

    #[test]
    fn primitive_edits_patch_in_place() {
        let mut ws = ws(r#"{"a":1,"b":2}"#);
        let edit = ws.edit_cell(0, 1, "9").unwrap();
        assert_eq!(edit.path, p("a"));
        assert!(!edit.outcome.reshaped);

        assert_eq!(ws.table().unwrap().cell(0, 1).unwrap().text, "9");
        assert_eq!(ws.table().unwrap().cell_path(0, 1), Some(&p("a")));
        let row = ws.tree_rows().iter().find(|r| r.path == p("a")).unwrap();
        assert_eq!(row.preview, "9");
        // Still the same view location; no extra history entry.
        assert_eq!(ws.history_position(), Some((1, 1)));
    }

    #[test]
    fn editing_a_structural_cell_is_rejected() {
        let mut ws = ws(r#"{"a":1}"#);
        assert!(matches!(
            ws.edit_cell(0, 0, "x"),
            Err(DocumentError::StructuralConstraint(_))
        ));
        assert!(!ws.dirty());
    }

    #[test]
    fn drilling_and_navigating_track_history() {
        let mut ws = ws(r#"{"a":{"b":[1,2]}}"#);
        ws.drill(p("a")).unwrap();
        ws.drill(p("a.b")).unwrap();
        assert_eq!(ws.history_position(), Some((3, 3)));

        let back = ws.navigate(NavDirection::Back).unwrap();
        assert_eq!(back, Some(p("a")));
        assert_eq!(ws.table_path(), &p("a"));

        let forward = ws.navigate(NavDirection::Forward).unwrap();
        assert_eq!(forward, Some(p("a.b")));
        assert_eq!(ws.table().unwrap().kind, TableKind::IndexValue);
    }

    #[test]
    fn navigating_to_a_deleted_location_fails_and_stays_put() {
        let mut ws = ws(r#"{"a":{"x":1},"keep":2}"#);
        ws.drill(p("a")).unwrap();
        ws.navigate(NavDirection::Back).unwrap();

        // Remove "a" while the forward entry still points into it.
        ws.delete_key(0).unwrap();
        let err = ws.navigate(NavDirection::Forward).unwrap_err();
        assert_eq!(err, DocumentError::PathNotFound(p("a")));
        assert_eq!(ws.table_path(), &JsonPath::root());
    }

    #[test]
    fn workspace_surfaces_document_failures_unchanged() {
        let mut ws = ws(r#"{"a":1}"#);
        assert!(matches!(
            ws.add_key("a", JsonValue::Null),
            Err(DocumentError::KeyExists(_))
        ));
        assert!(!ws.dirty());
        ws.edit_cell(0, 1, "5").unwrap();
        assert!(ws.dirty());
    }

    #[test]
    fn editing_a_missing_row_key_creates_it() {
        let mut ws = ws(r#"[{"a":1,"b":2},{"a":3}]"#);
        let edit = ws.edit_cell(1, 1, "true").unwrap();
        assert!(edit.outcome.reshaped);
        assert_eq!(
            ws.table().unwrap().cell(1, 1).unwrap().text,
            "true"
        );
    }

    #[test]
    fn row_operations_follow_the_array_layouts() {
        let mut ws = ws(r#"[{"a":1},{"a":2}]"#);
        ws.add_row().unwrap();
        assert_eq!(ws.table().unwrap().rows.len(), 3);
        // The fresh row carries the columns as editable nulls.
        assert_eq!(ws.table().unwrap().cell(2, 0).unwrap().text, "null");

        ws.move_row(2, 0).unwrap();
        assert_eq!(ws.table().unwrap().cell(0, 0).unwrap().text, "null");
        ws.delete_row(0).unwrap();
        assert_eq!(ws.table().unwrap().rows.len(), 2);

        let mut ws = ws(r#"{"a":1}"#);
        assert!(matches!(
            ws.add_row(),
            Err(DocumentError::StructuralConstraint(_))
        ));
    }

    #[test]
    fn key_operations_follow_the_key_value_layout() {
        let mut ws = ws(r#"{"a":1}"#);
        ws.add_key("b", JsonValue::parse_str("{}").unwrap()).unwrap();
        assert_eq!(ws.table().unwrap().rows.len(), 2);

        ws.rename_key(1, "renamed").unwrap();
        assert_eq!(ws.table().unwrap().cell(1, 0).unwrap().text, "renamed");

        ws.delete_key(0).unwrap();
        assert_eq!(ws.table().unwrap().cell(0, 0).unwrap().text, "renamed");
    }

    #[test]
    fn renaming_a_key_rekeys_expanded_tree_paths() {
        let mut ws = ws(r#"{"outer":{"inner":{"x":1}}}"#);
        ws.toggle_expanded(&p("outer"));
        ws.toggle_expanded(&p("outer.inner"));
        assert!(ws.tree_rows().iter().any(|r| r.path == p("outer.inner.x")));

        ws.rename_key(0, "renamed").unwrap();
        assert!(ws.tree_rows().iter().any(|r| r.path == p("renamed.inner.x")));
    }

    #[test]
    fn column_operations_touch_the_whole_grid() {
        let mut ws = ws(r#"[{"a":1},{"a":2}]"#);
        ws.add_column("b").unwrap();
        assert_eq!(ws.table().unwrap().headers, ["a", "b"]);

        ws.rename_column(1, "c").unwrap();
        assert_eq!(ws.table().unwrap().headers, ["a", "c"]);

        ws.delete_column(0).unwrap();
        assert_eq!(ws.table().unwrap().headers, ["c"]);
    }

    #[test]
    fn csv_tables_load_only_their_first_row() {
        let mut ws = Workspace::default();
        let outcome = ws.load_csv_text("a,b\n1,x\n2,y\n3,z").unwrap();
        assert_eq!(outcome.discarded_rows, 2);
        assert_eq!(ws.table().unwrap().kind, TableKind::KeyValue);
        assert_eq!(ws.table().unwrap().cell(0, 1).unwrap().text, "1");
    }

    #[test]
    fn key_value_csv_loads_whole() {
        let mut ws = Workspace::default();
        let outcome = ws.load_csv_text("key,value\na,1\nb,2").unwrap();
        assert_eq!(outcome.discarded_rows, 0);
        assert_eq!(ws.table().unwrap().rows.len(), 2);
    }

    #[test]
    fn capture_template_takes_the_focused_value() {
        let mut ws = ws(r#"{"part":{"x":1}}"#);
        ws.drill(p("part")).unwrap();
        ws.capture_template("part snapshot").unwrap();
        assert_eq!(
            ws.templates.get("part snapshot").unwrap().value,
            JsonValue::parse_str(r#"{"x":1}"#).unwrap()
        );
    }

    #[test]
    fn diff_report_reflects_edits_since_load() {
        let mut ws = ws(r#"{"a":1}"#);
        assert!(!ws.diff_report().unwrap().has_changes());
        ws.edit_cell(0, 1, "2").unwrap();
        let report = ws.diff_report().unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.removed, 1);
    }
}
