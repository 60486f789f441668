use crate::path::JsonPath;
use crate::statics;
use crate::value::JsonValue;

/// Which of the five table layouts a value projects into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Non-empty array whose elements are all objects: one row per
    /// element, one column per key of the first element that has any.
    Rows,
    /// Any other array: a read-only index column plus a value column.
    IndexValue,
    /// Non-empty object whose values are all arrays: one column per key,
    /// shorter columns padded with blank read-only cells.
    KeyedColumns,
    /// Any other object: key and value columns, one row per entry.
    KeyValue,
    /// A primitive: a single row naming and showing it.
    Single,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    /// Document location this cell shows. Structural cells (indices, key
    /// labels, padding) have none.
    pub path: Option<JsonPath>,
    /// Set for non-empty containers; clicking navigates instead of editing.
    pub drill: Option<JsonPath>,
    pub editable: bool,
}

impl Cell {
    fn structural(text: impl Into<String>) -> Cell {
        Cell { text: text.into(), path: None, drill: None, editable: false }
    }

    fn for_value(value: &JsonValue, path: JsonPath) -> Cell {
        let drill = (value.is_container() && !value.is_empty_container()).then(|| path.clone());
        let editable = drill.is_none();
        Cell { text: value.preview(), path: Some(path), drill, editable }
    }

    /// A key the row object does not have. Editing writes through and
    /// creates it.
    fn missing(path: JsonPath) -> Cell {
        Cell { text: String::new(), path: Some(path), drill: None, editable: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub kind: TableKind,
    pub path: JsonPath,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableModel {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    /// The document path behind a cell, None for structural cells. Exact
    /// inverse of projection: resolving it yields the cell's value.
    pub fn cell_path(&self, row: usize, col: usize) -> Option<&JsonPath> {
        self.cell(row, col)?.path.as_ref()
    }
}

/// Project the value at `path` into a table.
pub fn project(value: &JsonValue, path: &JsonPath) -> TableModel {
    match value {
        JsonValue::Array(values)
            if !values.is_empty() && values.iter().all(|v| v.as_object().is_some()) =>
        {
            rows_table(values, path)
        }
        JsonValue::Array(values) => index_value_table(values, path),
        JsonValue::Object(map)
            if !map.is_empty() && map.values().all(|v| v.as_array().is_some()) =>
        {
            keyed_columns_table(map, path)
        }
        JsonValue::Object(map) => key_value_table(map, path),
        primitive => single_table(primitive, path),
    }
}

fn rows_table(values: &[JsonValue], path: &JsonPath) -> TableModel {
    let headers: Vec<String> = values
        .iter()
        .filter_map(JsonValue::as_object)
        .find(|map| !map.is_empty())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(values.len());
    for (i, item) in values.iter().enumerate() {
        let Some(map) = item.as_object() else { continue };
        let row_path = path.child_index(i);
        let cells = headers
            .iter()
            .map(|header| match map.get(header) {
                Some(value) => Cell::for_value(value, row_path.child_key(header)),
                None => Cell::missing(row_path.child_key(header)),
            })
            .collect();
        rows.push(cells);
    }
    TableModel { kind: TableKind::Rows, path: path.clone(), headers, rows }
}

fn index_value_table(values: &[JsonValue], path: &JsonPath) -> TableModel {
    let headers = vec![
        statics::EN_COL_INDEX.to_string(),
        statics::EN_COL_VALUE.to_string(),
    ];
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                Cell::structural(i.to_string()),
                Cell::for_value(item, path.child_index(i)),
            ]
        })
        .collect();
    TableModel { kind: TableKind::IndexValue, path: path.clone(), headers, rows }
}

fn keyed_columns_table(
    map: &indexmap::IndexMap<String, JsonValue>,
    path: &JsonPath,
) -> TableModel {
    let headers: Vec<String> = map.keys().cloned().collect();
    let depth = map
        .values()
        .filter_map(JsonValue::as_array)
        .map(<[JsonValue]>::len)
        .max()
        .unwrap_or(0);

    let mut rows = Vec::with_capacity(depth);
    for r in 0..depth {
        let cells = map
            .iter()
            .map(|(key, column)| match column.as_array().and_then(|a| a.get(r)) {
                Some(item) => Cell::for_value(item, path.child_key(key).child_index(r)),
                None => Cell::structural(""),
            })
            .collect();
        rows.push(cells);
    }
    TableModel { kind: TableKind::KeyedColumns, path: path.clone(), headers, rows }
}

fn key_value_table(
    map: &indexmap::IndexMap<String, JsonValue>,
    path: &JsonPath,
) -> TableModel {
    let headers = vec![
        statics::EN_COL_KV_KEY.to_string(),
        statics::EN_COL_KV_VALUE.to_string(),
    ];
    let rows = map
        .iter()
        .map(|(key, value)| {
            vec![
                Cell::structural(key.clone()),
                Cell::for_value(value, path.child_key(key)),
            ]
        })
        .collect();
    TableModel { kind: TableKind::KeyValue, path: path.clone(), headers, rows }
}

fn single_table(value: &JsonValue, path: &JsonPath) -> TableModel {
    let headers = vec![
        statics::EN_COL_KV_KEY.to_string(),
        statics::EN_COL_KV_VALUE.to_string(),
    ];
    let label = path
        .split_last()
        .map(|(_, last)| last.to_string())
        .unwrap_or_else(|| statics::EN_COL_KV_VALUE.to_string());
    let rows = vec![vec![
        Cell::structural(label),
        Cell::for_value(value, path.clone()),
    ]];
    TableModel { kind: TableKind::Single, path: path.clone(), headers, rows }
}

#[cfg(test)]
mod tests {
    use super::{TableKind, project};
    use crate::path::JsonPath;
    use crate::value::JsonValue;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> JsonValue {
        JsonValue::parse_str(text).unwrap()
    }

    #[test]
    fn array_of_objects_projects_as_rows() {
        let value = parse(r#"[{"a":1,"b":"x"},{"a":2}]"#);
        let model = project(&value, &JsonPath::root());

        assert_eq!(model.kind, TableKind::Rows);
        assert_eq!(model.headers, ["a", "b"]);
        assert_eq!(model.rows.len(), 2);
        assert_eq!(model.cell(0, 0).unwrap().text, "1");
        assert_eq!(model.cell_path(0, 1), Some(&JsonPath::parse("[0].b")));

        // Second row lacks "b": blank but editable through its path.
        let missing = model.cell(1, 1).unwrap();
        assert_eq!(missing.text, "");
        assert!(missing.editable);
        assert_eq!(missing.path, Some(JsonPath::parse("[1].b")));
    }

    #[test]
    fn headers_come_from_the_first_object_with_keys() {
        let value = parse(r#"[{},{"later":1},{"other":2}]"#);
        let model = project(&value, &JsonPath::root());
        assert_eq!(model.kind, TableKind::Rows);
        assert_eq!(model.headers, ["later"]);
        assert_eq!(model.rows.len(), 3);
    }

    #[test]
    fn mixed_array_projects_as_index_value() {
        let value = parse(r#"[1,{"a":2},"three"]"#);
        let model = project(&value, &JsonPath::parse("items"));

        assert_eq!(model.kind, TableKind::IndexValue);
        assert_eq!(model.headers, ["Index", "Value"]);
        let index_cell = model.cell(1, 0).unwrap();
        assert_eq!(index_cell.text, "1");
        assert!(index_cell.path.is_none());
        assert_eq!(model.cell_path(2, 1), Some(&JsonPath::parse("items[2]")));
    }

    #[test]
    fn empty_array_projects_as_empty_index_value() {
        let model = project(&parse("[]"), &JsonPath::root());
        assert_eq!(model.kind, TableKind::IndexValue);
        assert!(model.rows.is_empty());
    }

    #[test]
    fn object_of_arrays_projects_as_keyed_columns_with_padding() {
        let value = parse(r#"{"xs":[1,2,3],"ys":[4,5]}"#);
        let model = project(&value, &JsonPath::root());

        assert_eq!(model.kind, TableKind::KeyedColumns);
        assert_eq!(model.headers, ["xs", "ys"]);
        assert_eq!(model.rows.len(), 3);
        assert_eq!(model.cell_path(1, 1), Some(&JsonPath::parse("ys[1]")));

        let padding = model.cell(2, 1).unwrap();
        assert_eq!(padding.text, "");
        assert!(padding.path.is_none());
        assert!(!padding.editable);
    }

    #[test]
    fn general_object_projects_as_key_value() {
        let value = parse(r#"{"name":"ada","tags":[1,2],"empty":{}}"#);
        let model = project(&value, &JsonPath::root());

        assert_eq!(model.kind, TableKind::KeyValue);
        assert_eq!(model.headers, ["key", "value"]);
        assert_eq!(model.cell(0, 0).unwrap().text, "name");
        assert!(model.cell(0, 0).unwrap().path.is_none());

        // Non-empty container: drillable, not editable in place.
        let tags = model.cell(1, 1).unwrap();
        assert_eq!(tags.drill, Some(JsonPath::parse("tags")));
        assert!(!tags.editable);

        // Empty container: editable replacement target, nothing to drill into.
        let empty = model.cell(2, 1).unwrap();
        assert!(empty.drill.is_none());
        assert!(empty.editable);
    }

    #[test]
    fn primitive_projects_as_single_row() {
        let root = parse(r#"{"config":{"port":8080}}"#);
        let path = JsonPath::parse("config.port");
        let value = path.resolve(&root).unwrap();
        let model = project(value, &path);

        assert_eq!(model.kind, TableKind::Single);
        assert_eq!(model.rows.len(), 1);
        assert_eq!(model.cell(0, 0).unwrap().text, "port");
        assert_eq!(model.cell(0, 1).unwrap().text, "8080");
        assert_eq!(model.cell_path(0, 1), Some(&path));
    }

    #[test]
    fn root_primitive_labels_itself_value() {
        let model = project(&parse("true"), &JsonPath::root());
        assert_eq!(model.cell(0, 0).unwrap().text, "value");
        assert_eq!(model.cell_path(0, 1), Some(&JsonPath::root()));
    }

    #[test]
    fn cell_paths_resolve_back_to_the_projected_values() {
        let root = parse(
            r#"{
              "rows":[{"a":1,"b":[true]},{"a":2}],
              "cols":{"xs":[1,2],"ys":[3]},
              "plain":{"k":"v","nest":{"x":1}},
              "list":[1,"two",null]
            }"#,
        );
        for at in ["rows", "cols", "plain", "list", "plain.k"] {
            let path = JsonPath::parse(at);
            let value = path.resolve(&root).unwrap();
            let model = project(value, &path);
            for (r, row) in model.rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    let Some(cell_path) = model.cell_path(r, c) else { continue };
                    match cell_path.resolve(&root) {
                        Some(resolved) => {
                            assert_eq!(resolved.preview(), cell.text, "cell ({r},{c}) at {at}")
                        }
                        // Missing row keys have a path but no value yet.
                        None => assert_eq!(cell.text, "", "cell ({r},{c}) at {at}"),
                    }
                }
            }
        }
    }
}
