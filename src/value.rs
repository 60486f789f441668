use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Represents a number that preserves the distinction between I64, U64, and F64
/// so integer-looking values never pick up a trailing ".0" on the way back out.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl JsonNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonNumber::I64(v) => Some(*v),
            JsonNumber::U64(v) => i64::try_from(*v).ok(),
            JsonNumber::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            JsonNumber::I64(v) => *v as f64,
            JsonNumber::U64(v) => *v as f64,
            JsonNumber::F64(v) => *v,
        }
    }
}

impl std::fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut out = String::new();
        self.write_json(&mut out);
        f.write_str(&out)
    }
}

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonNumber::I64(v) => serializer.serialize_i64(*v),
            JsonNumber::U64(v) => serializer.serialize_u64(*v),
            JsonNumber::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for JsonNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = JsonNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(JsonNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                // Signed form whenever it fits; parsed numbers and typed-in
                // numbers must compare equal.
                Ok(i64::try_from(v).map_or(JsonNumber::U64(v), JsonNumber::I64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(JsonNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A JSON document value. Objects use an insertion-ordered map so documents
/// round-trip with their original key order intact.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(JsonNumber),
    String(String),
    Array(Vec<JsonValue>),
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, JsonValue>> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, JsonValue>> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<JsonValue>> {
        match self {
            JsonValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.as_object_mut().and_then(|m| m.get_mut(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "bool",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, JsonValue::Array(_) | JsonValue::Object(_))
    }

    pub fn is_empty_container(&self) -> bool {
        match self {
            JsonValue::Array(values) => values.is_empty(),
            JsonValue::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn parse_str(text: &str) -> anyhow::Result<JsonValue> {
        Ok(serde_json::from_str::<JsonValue>(text)?)
    }

    pub fn to_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, true);
        out.push('\n');
        out
    }

    pub fn to_compact(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, false);
        out
    }

    /// Short single-line description for tree rows and table cells:
    /// scalars verbatim (long strings truncated), containers as "[len]" / "{len}".
    pub fn preview(&self) -> String {
        match self {
            JsonValue::Null => "null".to_string(),
            JsonValue::Bool(v) => v.to_string(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) => {
                if s.chars().count() > 60 {
                    let head: String = s.chars().take(57).collect();
                    format!("{head}...")
                } else {
                    s.clone()
                }
            }
            JsonValue::Array(values) => format!("[{}]", values.len()),
            JsonValue::Object(map) => format!("{{{}}}", map.len()),
        }
    }

    /// Serialize in the editor's canonical style:
    /// - 2-space indentation when pretty
    /// - keys in insertion order, always quoted
    /// - empty containers on one line
    fn write_json(&self, out: &mut String, indent: usize, pretty: bool) {
        match self {
            JsonValue::Null => out.push_str("null"),
            JsonValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            JsonValue::Number(n) => n.write_json(out),
            JsonValue::String(s) => write_escaped_string(out, s),
            JsonValue::Array(values) => {
                out.push('[');
                if pretty && !values.is_empty() {
                    out.push('\n');
                }
                for (i, v) in values.iter().enumerate() {
                    if pretty {
                        out.push_str(&" ".repeat(indent + 2));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                    }
                }
                if pretty && !values.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            JsonValue::Object(map) => {
                out.push('{');
                if pretty && !map.is_empty() {
                    out.push('\n');
                }
                for (i, (k, v)) in map.iter().enumerate() {
                    if pretty {
                        out.push_str(&" ".repeat(indent + 2));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    write_escaped_string(out, k);
                    out.push(':');
                    if pretty {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                    }
                }
                if pretty && !map.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

impl JsonNumber {
    fn write_json(&self, out: &mut String) {
        match self {
            JsonNumber::I64(v) => out.push_str(&v.to_string()),
            JsonNumber::U64(v) => out.push_str(&v.to_string()),
            JsonNumber::F64(v) => {
                if v.is_finite() {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format(*v));
                } else {
                    // Strict JSON has no NaN/Infinity literal.
                    out.push_str("null");
                }
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04X}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(v) => serializer.serialize_bool(*v),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(values) => values.serialize(serializer),
            JsonValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = JsonValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(JsonValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(JsonValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(JsonValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(JsonValue::Number(JsonNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let n = i64::try_from(v).map_or(JsonNumber::U64(v), JsonNumber::I64);
                Ok(JsonValue::Number(n))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(JsonValue::Number(JsonNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(JsonValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(JsonValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<JsonValue>()? {
                    values.push(value);
                }
                Ok(JsonValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, JsonValue>()? {
                    values.insert(key, value);
                }
                Ok(JsonValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
