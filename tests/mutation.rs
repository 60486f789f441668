use jge::{Document, DocumentError, JsonPath, JsonValue};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn editing_a_value_marks_dirty_and_changes_the_text() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"speed": 9, "label": "fast"}"#)?;
    assert!(!doc.dirty);

    let outcome = doc.set_value_at_path(&JsonPath::parse("speed"), "12")?;
    assert_eq!(outcome.old.as_ref().map(|v| v.preview()), Some("9".to_string()));
    assert_eq!(outcome.new.preview(), "12");
    assert!(!outcome.reshaped);
    assert!(doc.dirty);
    assert!(doc.to_pretty_text().expect("loaded").contains("\"speed\": 12"));
    Ok(())
}

#[test]
fn leading_zero_numerals_stay_strings() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"speed": 9}"#)?;

    let outcome = doc.set_value_at_path(&JsonPath::parse("speed"), "01")?;
    assert_eq!(outcome.new, JsonValue::String("01".to_string()));
    Ok(())
}

#[test]
fn writing_to_a_missing_object_key_creates_it_at_the_end() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"a": 1}"#)?;

    let outcome = doc.set_value_at_path(&JsonPath::parse("b"), "true")?;
    assert_eq!(outcome.old, None);
    assert!(outcome.reshaped);
    assert_eq!(outcome.new, JsonValue::Bool(true));

    let keys: Vec<_> = doc
        .root()
        .and_then(|v| v.as_object())
        .expect("object root")
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, ["a", "b"]);
    Ok(())
}

#[test]
fn failed_writes_leave_the_document_untouched() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"a": [1, 2]}"#)?;
    let before = doc.to_pretty_text().expect("loaded");

    let err = doc
        .set_value_at_path(&JsonPath::parse("a[5]"), "9")
        .unwrap_err();
    assert!(
        matches!(err, DocumentError::IndexOutOfRange { index: 5, len: 2 }),
        "got {err:?}"
    );

    let err = doc
        .set_value_at_path(&JsonPath::parse("a[0].x"), "9")
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidParent(_)), "got {err:?}");

    let err = doc
        .set_value_at_path(&JsonPath::parse("missing.deep"), "9")
        .unwrap_err();
    assert!(matches!(err, DocumentError::PathNotFound(_)), "got {err:?}");

    assert_eq!(doc.to_pretty_text().expect("loaded"), before);
    assert!(!doc.dirty);
    Ok(())
}

#[test]
fn a_primitive_root_takes_values_but_a_container_root_does_not() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text("5")?;

    // Any non-empty path under a primitive root fails.
    let err = doc
        .set_value_at_path(&JsonPath::parse("a"), "1")
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidParent(_)), "got {err:?}");

    let outcome = doc.set_value_at_path(&JsonPath::root(), "7")?;
    assert_eq!(outcome.new.preview(), "7");

    doc.load_text(r#"{"a": 1}"#)?;
    let err = doc
        .set_value_at_path(&JsonPath::root(), "7")
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidParent(_)), "got {err:?}");
    Ok(())
}

#[test]
fn renaming_a_key_keeps_its_position_and_value() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"first": 1, "target": {"x": 1}, "last": 3}"#)?;

    let outcome = doc.rename_key_at_path(&JsonPath::parse("target"), "renamed")?;
    assert_eq!(outcome, jge::RenameOutcome::Renamed);

    let keys: Vec<_> = doc
        .root()
        .and_then(|v| v.as_object())
        .expect("object root")
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, ["first", "renamed", "last"]);
    assert!(doc.value_at(&JsonPath::parse("renamed.x")).is_some());
    Ok(())
}

#[test]
fn renaming_to_the_same_name_is_a_clean_no_op() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"a": 1}"#)?;

    let outcome = doc.rename_key_at_path(&JsonPath::parse("a"), "a")?;
    assert_eq!(outcome, jge::RenameOutcome::Unchanged);
    assert!(!doc.dirty);
    Ok(())
}

#[test]
fn renaming_onto_an_existing_key_is_rejected() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"a": 1, "b": 2}"#)?;
    let before = doc.to_pretty_text().expect("loaded");

    let err = doc
        .rename_key_at_path(&JsonPath::parse("a"), "b")
        .unwrap_err();
    assert!(matches!(err, DocumentError::KeyExists(_)), "got {err:?}");
    assert_eq!(doc.to_pretty_text().expect("loaded"), before);
    Ok(())
}

#[test]
fn array_elements_insert_move_and_remove_in_order() -> Result<()> {
    let mut doc = Document::default();
    doc.load_text(r#"{"list": [10, 20, 30]}"#)?;
    let list = JsonPath::parse("list");

    doc.insert_element(&list, 1, JsonValue::Null)?;
    doc.move_element(&list, 0, 3)?;
    doc.remove_element(&list, 0)?;

    let text = doc.to_pretty_text().expect("loaded");
    let compact: Vec<_> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    assert_eq!(
        compact,
        ["{", "\"list\": [", "20,", "30,", "10", "]", "}"]
    );
    Ok(())
}
