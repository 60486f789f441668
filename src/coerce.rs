use crate::value::{JsonNumber, JsonValue};

/// Turn raw edit text into a typed value.
///
/// Keyword matches are case-insensitive and ignore surrounding whitespace.
/// Numeric text is accepted when it is unambiguous on its own (a decimal
/// point or a canonical integer spelling) or when it names the same number
/// the cell already held, so "007" stays a string in a fresh cell but keeps
/// meaning 7 when the cell was already 7. Everything else is kept verbatim,
/// whitespace included.
pub fn coerce(raw: &str, original: &JsonValue) -> JsonValue {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return JsonValue::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return JsonValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return JsonValue::Bool(false);
    }
    if let Some(parsed) = parse_number_lenient(trimmed)
        && number_accepted(trimmed, &parsed, original)
    {
        return JsonValue::Number(parsed);
    }
    JsonValue::String(raw.to_string())
}

/// CSV cell variant: blank cells become null, and cells that look like an
/// embedded JSON container are parsed back into one. Cells have no prior
/// value, so numeric acceptance runs without one.
pub fn coerce_csv_cell(raw: &str) -> JsonValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return JsonValue::Null;
    }
    if (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'))
    {
        if let Ok(value) = JsonValue::parse_str(trimmed) {
            return value;
        }
    }
    coerce(raw, &JsonValue::Null)
}

fn parse_number_lenient(text: &str) -> Option<JsonNumber> {
    if text.is_empty() {
        return None;
    }
    if let Ok(v) = text.parse::<i64>() {
        return Some(JsonNumber::I64(v));
    }
    if let Ok(v) = text.parse::<u64>() {
        return Some(JsonNumber::U64(v));
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(JsonNumber::F64(v)),
        _ => None,
    }
}

fn number_accepted(trimmed: &str, parsed: &JsonNumber, original: &JsonValue) -> bool {
    if let JsonValue::Number(orig) = original
        && orig.as_f64() == parsed.as_f64()
    {
        return true;
    }
    trimmed.contains('.') || is_canonical_integer(trimmed) || parsed.to_string() == trimmed
}

// "0" or digits without a leading zero, with an optional minus sign.
fn is_canonical_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    digits == "0" || !digits.starts_with('0')
}
