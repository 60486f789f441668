use crate::coerce::coerce_csv_cell;
use crate::statics;
use crate::value::JsonValue;
use indexmap::{IndexMap, IndexSet};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("reading CSV: {0}")]
    Read(csv::Error),
    #[error("writing CSV: {0}")]
    Write(String),
}

/// Parse CSV text into a document value.
///
/// The first non-blank record is the header row. Two-column input whose
/// first header is a key-ish word ("key", "property", "name", "field",
/// "item", any case) and whose second is exactly "value" becomes a single
/// flat object; anything else becomes an array of row objects. Blank
/// headers and surplus cells get synthesized `column_N` names, short rows
/// pad with null, and rows whose every cell coerces to null are dropped.
pub fn csv_to_json(text: &str) -> Result<JsonValue, CsvError> {
    let text = normalize_line_endings(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(CsvError::Read)?);
    }
    let Some((header_record, data)) = records.split_first() else {
        return Ok(JsonValue::Array(Vec::new()));
    };

    let headers: Vec<String> = header_record
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            if h.is_empty() { placeholder_name(i) } else { h.to_string() }
        })
        .collect();

    if is_key_value_header(header_record) {
        let mut map = IndexMap::new();
        for record in data {
            let key = record.get(0).unwrap_or("").trim();
            if key.is_empty() {
                continue;
            }
            map.insert(key.to_string(), coerce_csv_cell(record.get(1).unwrap_or("")));
        }
        return Ok(JsonValue::Object(map));
    }

    let mut rows = Vec::new();
    for record in data {
        let width = record.len().max(headers.len());
        let mut row = IndexMap::new();
        for i in 0..width {
            let name = headers.get(i).cloned().unwrap_or_else(|| placeholder_name(i));
            let value = match record.get(i) {
                Some(cell) => coerce_csv_cell(cell),
                None => JsonValue::Null,
            };
            row.insert(name, value);
        }
        if row.values().all(|v| *v == JsonValue::Null) {
            continue;
        }
        rows.push(JsonValue::Object(row));
    }
    Ok(JsonValue::Array(rows))
}

/// Render a document value as CSV text.
///
/// Arrays of objects become a grid under the union of their keys in
/// first-seen order; other arrays become a single "value" column; a lone
/// object becomes key/value rows; a lone primitive becomes a one-cell
/// "value" table. Nested containers are embedded as compact JSON.
pub fn json_to_csv(value: &JsonValue) -> Result<String, CsvError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());

    match value {
        JsonValue::Array(values) if values.is_empty() => return Ok(String::new()),
        JsonValue::Array(values) if values.iter().all(|v| v.as_object().is_some()) => {
            let mut headers = IndexSet::new();
            for item in values {
                if let Some(map) = item.as_object() {
                    for key in map.keys() {
                        headers.insert(key.clone());
                    }
                }
            }
            if headers.is_empty() {
                return Ok(String::new());
            }
            write_record(&mut writer, headers.iter().map(String::as_str))?;
            for item in values {
                let Some(map) = item.as_object() else { continue };
                let cells: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h).map(cell_text).unwrap_or_default())
                    .collect();
                write_record(&mut writer, cells.iter().map(String::as_str))?;
            }
        }
        JsonValue::Array(values) => {
            write_record(&mut writer, [statics::CSV_VALUE_HEADER])?;
            for item in values {
                write_record(&mut writer, [cell_text(item).as_str()])?;
            }
        }
        JsonValue::Object(map) => {
            write_record(&mut writer, [statics::CSV_KEY_HEADER, statics::CSV_VALUE_HEADER])?;
            for (key, item) in map {
                write_record(&mut writer, [key.as_str(), cell_text(item).as_str()])?;
            }
        }
        primitive => {
            write_record(&mut writer, [statics::CSV_VALUE_HEADER])?;
            write_record(&mut writer, [cell_text(primitive).as_str()])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Write(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| CsvError::Write(e.to_string()))?;
    // One terminator per record; the final one is not part of the text.
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn write_record<'a, W, I>(writer: &mut csv::Writer<W>, fields: I) -> Result<(), CsvError>
where
    W: std::io::Write,
    I: IntoIterator<Item = &'a str>,
{
    writer
        .write_record(fields)
        .map_err(|e| CsvError::Write(e.to_string()))
}

fn is_key_value_header(header: &csv::StringRecord) -> bool {
    if header.len() != 2 {
        return false;
    }
    let first = header.get(0).unwrap_or("").trim();
    let second = header.get(1).unwrap_or("").trim();
    statics::CSV_KEY_HEADER_ALIASES
        .iter()
        .any(|alias| first.eq_ignore_ascii_case(alias))
        && second == statics::CSV_VALUE_HEADER
}

// 1-based, matching what spreadsheet users expect.
fn placeholder_name(column: usize) -> String {
    format!("{}{}", statics::CSV_PLACEHOLDER_PREFIX, column + 1)
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(v) => v.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        container => container.to_compact(),
    }
}

// Bare-CR files (classic Mac exports) confuse the reader; LF and CRLF
// are already understood.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') && !text.contains('\n') {
        Cow::Owned(text.replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
