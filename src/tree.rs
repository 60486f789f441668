use crate::path::JsonPath;
use crate::value::JsonValue;
use std::collections::BTreeSet;

/// One visible line of the tree panel, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub path: JsonPath,
    pub depth: usize,
    pub label: String,
    pub preview: String,
    pub expandable: bool,
    pub expanded: bool,
}

/// Flatten the document into tree rows, descending only into paths in
/// `expanded`. Empty containers have nothing to expand.
pub fn project(root: &JsonValue, expanded: &BTreeSet<JsonPath>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    walk(root, &JsonPath::root(), 0, expanded, &mut rows);
    rows
}

fn walk(
    value: &JsonValue,
    path: &JsonPath,
    depth: usize,
    expanded: &BTreeSet<JsonPath>,
    rows: &mut Vec<TreeRow>,
) {
    let label = match path.split_last() {
        Some((_, last)) => last.to_string(),
        None => path.label(),
    };
    let expandable = value.is_container() && !value.is_empty_container();
    let is_expanded = expandable && expanded.contains(path);
    rows.push(TreeRow {
        path: path.clone(),
        depth,
        label,
        preview: value.preview(),
        expandable,
        expanded: is_expanded,
    });
    if !is_expanded {
        return;
    }
    match value {
        JsonValue::Array(values) => {
            for (i, item) in values.iter().enumerate() {
                walk(item, &path.child_index(i), depth + 1, expanded, rows);
            }
        }
        JsonValue::Object(map) => {
            for (key, item) in map {
                walk(item, &path.child_key(key), depth + 1, expanded, rows);
            }
        }
        _ => {}
    }
}
