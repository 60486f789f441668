use crate::value::JsonValue;

/// One step of a document path: an object key or an array index.
///
/// Dotted text has no type information, so numeric tokens are carried as
/// [`Step::Index`] and re-interpreted against whichever container they meet
/// when the path is resolved. An `Index` step walking an object looks up the
/// decimal string form; a `Key` step walking an array is accepted only when
/// it is the canonical decimal spelling of an index ("7", never "007").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl Step {
    fn from_token(token: &str) -> Step {
        match token.parse::<usize>() {
            Ok(n) if n.to_string() == token => Step::Index(n),
            _ => Step::Key(token.to_string()),
        }
    }

    fn resolve_in<'a>(&self, value: &'a JsonValue) -> Option<&'a JsonValue> {
        match value {
            JsonValue::Object(map) => map.get(self.object_key().as_ref()),
            JsonValue::Array(values) => values.get(self.array_index()?),
            _ => None,
        }
    }

    fn resolve_in_mut<'a>(&self, value: &'a mut JsonValue) -> Option<&'a mut JsonValue> {
        match value {
            JsonValue::Object(map) => map.get_mut(self.object_key().as_ref()),
            JsonValue::Array(values) => {
                let i = self.array_index()?;
                values.get_mut(i)
            }
            _ => None,
        }
    }

    /// The key this step names when it lands on an object.
    pub fn object_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Step::Key(k) => std::borrow::Cow::Borrowed(k),
            Step::Index(i) => std::borrow::Cow::Owned(i.to_string()),
        }
    }

    /// The index this step names when it lands on an array, if any.
    pub fn array_index(&self) -> Option<usize> {
        match self {
            Step::Index(i) => Some(*i),
            Step::Key(k) => match Self::from_token(k) {
                Step::Index(i) => Some(i),
                Step::Key(_) => None,
            },
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Step::Key(k) => Some(k),
            Step::Index(_) => None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Step::Key(k) => f.write_str(k),
            Step::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Dotted-path address of a value inside a document, e.g. `users[2].name`.
///
/// The empty path addresses the document root. Keys containing a literal
/// '.' or '[' cannot be addressed; the text form has no escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonPath {
    steps: Vec<Step>,
}

impl JsonPath {
    pub fn root() -> JsonPath {
        JsonPath::default()
    }

    /// Parse dotted text. Bracket indexing is sugar: `a[0].b` and `a.0.b`
    /// name the same location. Parsing never fails; tokens that address
    /// nothing simply fail to resolve later.
    pub fn parse(text: &str) -> JsonPath {
        if text.is_empty() {
            return JsonPath::root();
        }
        let rewritten = text.replace('[', ".").replace(']', "");
        let mut steps = Vec::new();
        for (i, token) in rewritten.split('.').enumerate() {
            // A leading bracket leaves an empty first token behind.
            if i == 0 && token.is_empty() {
                continue;
            }
            steps.push(Step::from_token(token));
        }
        JsonPath { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Human-readable form; the empty root path reads as "(root)".
    pub fn label(&self) -> String {
        if self.is_root() {
            "(root)".to_string()
        } else {
            self.to_string()
        }
    }

    pub fn child_key(&self, key: &str) -> JsonPath {
        let mut steps = self.steps.clone();
        steps.push(Step::from_token(key));
        JsonPath { steps }
    }

    pub fn child_index(&self, index: usize) -> JsonPath {
        let mut steps = self.steps.clone();
        steps.push(Step::Index(index));
        JsonPath { steps }
    }

    /// Split into (parent, final step). The root has neither.
    pub fn split_last(&self) -> Option<(JsonPath, Step)> {
        let (last, parent) = self.steps.split_last()?;
        Some((JsonPath { steps: parent.to_vec() }, last.clone()))
    }

    pub fn parent(&self) -> Option<JsonPath> {
        self.split_last().map(|(parent, _)| parent)
    }

    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        self.steps.len() >= prefix.steps.len()
            && self.steps[..prefix.steps.len()] == prefix.steps[..]
    }

    /// Rewrite `old_prefix` to `new_prefix` at the front of this path.
    /// Returns None when this path is not under `old_prefix`.
    pub fn reparent(&self, old_prefix: &JsonPath, new_prefix: &JsonPath) -> Option<JsonPath> {
        if !self.starts_with(old_prefix) {
            return None;
        }
        let mut steps = new_prefix.steps.clone();
        steps.extend_from_slice(&self.steps[old_prefix.steps.len()..]);
        Some(JsonPath { steps })
    }

    /// Walk `root` down this path. The root value itself is the result of
    /// the empty path; a primitive root resolves nothing else.
    pub fn resolve<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut current = root;
        for step in &self.steps {
            current = step.resolve_in(current)?;
        }
        Some(current)
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut JsonValue) -> Option<&'a mut JsonValue> {
        let mut current = root;
        for step in &self.steps {
            current = step.resolve_in_mut(current)?;
        }
        Some(current)
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Key(k) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(k)?;
                }
                Step::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonPath, Step};
    use crate::value::JsonValue;

    #[test]
    fn parse_then_display_is_identity_for_valid_paths() {
        for text in ["", "a", "a.b.c", "a[0]", "[3]", "a[0].b[12].c", "weird key.x"] {
            let path = JsonPath::parse(text);
            assert_eq!(JsonPath::parse(&path.to_string()), path, "path text {text:?}");
        }

        let built = JsonPath::root().child_key("users").child_index(2).child_key("name");
        assert_eq!(JsonPath::parse(&built.to_string()), built);
    }

    #[test]
    fn bracket_and_dot_forms_are_equivalent() {
        assert_eq!(JsonPath::parse("a[0].b"), JsonPath::parse("a.0.b"));
        assert_eq!(JsonPath::parse("a[0].b").to_string(), "a[0].b");
    }

    #[test]
    fn non_canonical_numeric_tokens_stay_keys() {
        let path = JsonPath::parse("a.007");
        assert_eq!(path.steps()[1], Step::Key("007".to_string()));
        assert_eq!(path.to_string(), "a.007");
    }

    #[test]
    fn resolve_walks_objects_and_arrays() {
        let root = JsonValue::parse_str(r#"{"users":[{"name":"ada"},{"name":"bob"}]}"#).unwrap();
        let got = JsonPath::parse("users[1].name").resolve(&root).unwrap();
        assert_eq!(got.as_str(), Some("bob"));
    }

    #[test]
    fn numeric_step_resolves_against_numeric_object_key() {
        let root = JsonValue::parse_str(r#"{"0":"zero","7":"seven"}"#).unwrap();
        assert_eq!(JsonPath::parse("[7]").resolve(&root).unwrap().as_str(), Some("seven"));
        assert_eq!(JsonPath::parse("0").resolve(&root).unwrap().as_str(), Some("zero"));
    }

    #[test]
    fn non_canonical_numeric_key_does_not_index_arrays() {
        let root = JsonValue::parse_str(r#"[10,20,30]"#).unwrap();
        assert!(JsonPath::parse("007").resolve(&root).is_none());
        assert_eq!(
            JsonPath::parse("2").resolve(&root),
            Some(&JsonValue::parse_str("30").unwrap())
        );
    }

    #[test]
    fn resolve_fails_out_of_bounds_and_past_primitives() {
        let root = JsonValue::parse_str(r#"{"a":[1]}"#).unwrap();
        assert!(JsonPath::parse("a[1]").resolve(&root).is_none());
        assert!(JsonPath::parse("a[0].b").resolve(&root).is_none());
        assert!(JsonPath::parse("missing").resolve(&root).is_none());

        let primitive = JsonValue::parse_str("42").unwrap();
        assert!(JsonPath::parse("x").resolve(&primitive).is_none());
        assert_eq!(JsonPath::root().resolve(&primitive), Some(&primitive));
    }

    #[test]
    fn split_last_and_parent() {
        let path = JsonPath::parse("a.b[2]");
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent, JsonPath::parse("a.b"));
        assert_eq!(last, Step::Index(2));
        assert_eq!(path.parent(), Some(JsonPath::parse("a.b")));
        assert!(JsonPath::root().split_last().is_none());
    }

    #[test]
    fn reparent_rewrites_matching_prefixes() {
        let old = JsonPath::parse("a.b");
        let new = JsonPath::parse("a.x");
        assert_eq!(
            JsonPath::parse("a.b.c[1]").reparent(&old, &new),
            Some(JsonPath::parse("a.x.c[1]"))
        );
        assert_eq!(JsonPath::parse("a.b").reparent(&old, &new), Some(new.clone()));
        assert!(JsonPath::parse("a.z.c").reparent(&old, &new).is_none());
    }
}
