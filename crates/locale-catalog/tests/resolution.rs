//! Integration tests for message lookup, fallback and interpolation.

use std::fs;

use locale_catalog::{CatalogStore, LookupError, Value, args};
use tempfile::TempDir;

/// Build a JSON store from `(locale, contents)` pairs. Every locale besides
/// `en` is registered after the store opens.
fn store_with(files: &[(&str, &str)]) -> (TempDir, CatalogStore) {
    let dir = TempDir::new().unwrap();
    for (locale, content) in files {
        fs::write(dir.path().join(format!("{locale}.json")), content).unwrap();
    }
    let mut store = CatalogStore::new(dir.path(), "json").unwrap();
    for (locale, _) in files {
        if *locale != "en" {
            store.add_locale(*locale).unwrap();
        }
    }
    (dir, store)
}

// =========================================================================
// Primary Lookup
// =========================================================================

#[test]
fn get_interpolates_named_argument() {
    let (_dir, store) = store_with(&[("en", r#"{"greeting": "Hello, {name}!"}"#)]);

    let text = store.get("greeting", &args! { "name" => "Ada" }).unwrap();

    assert_eq!(text, "Hello, Ada!");
}

#[test]
fn get_without_required_argument_fails() {
    let (_dir, store) = store_with(&[("en", r#"{"greeting": "Hello, {name}!"}"#)]);

    let err = store.get("greeting", &args! {}).unwrap_err();

    match err {
        LookupError::MissingInterpolationArgument { placeholder, path } => {
            assert_eq!(placeholder, "name");
            assert_eq!(path, "greeting");
        }
        other => panic!("expected missing argument, got {other:?}"),
    }
}

#[test]
fn extra_arguments_are_ignored() {
    let (_dir, store) = store_with(&[("en", r#"{"title": "Inbox"}"#)]);

    let text = store
        .get("title", &args! { "unused" => 1, "other" => "x" })
        .unwrap();

    assert_eq!(text, "Inbox");
}

#[test]
fn argument_values_are_stringified() {
    let (_dir, store) = store_with(&[(
        "en",
        r#"{"summary": "{count} items, {ratio} full, archived: {archived}"}"#,
    )]);

    let text = store
        .get(
            "summary",
            &args! { "count" => 3, "ratio" => 0.5, "archived" => false },
        )
        .unwrap();

    assert_eq!(text, "3 items, 0.5 full, archived: false");
}

#[test]
fn non_ascii_placeholder_names_interpolate() {
    let (_dir, store) = store_with(&[("en", r#"{"g": "Hallo, {naam-x}! {имя}"}"#)]);

    let text = store
        .get("g", &args! { "naam-x" => "A", "имя" => "B" })
        .unwrap();

    assert_eq!(text, "Hallo, A! B");
}

#[test]
fn oversized_count_becomes_float() {
    assert_eq!(Value::from(7_usize), Value::Number(7));
    assert!(matches!(Value::from(usize::MAX), Value::Float(f) if f > 0.0));
}

#[test]
fn nested_path_resolves_leaf() {
    let (_dir, store) = store_with(&[(
        "en",
        r#"{"errors": {"http": {"not_found": "Page {page} not found"}}}"#,
    )]);

    let text = store
        .get("errors.http.not_found", &args! { "page" => "/home" })
        .unwrap();

    assert_eq!(text, "Page /home not found");
}

#[test]
fn escaped_braces_are_literal() {
    let (_dir, store) = store_with(&[("en", r#"{"code": "Use {{name}} for {what}"}"#)]);

    let text = store.get("code", &args! { "what" => "names" }).unwrap();

    assert_eq!(text, "Use {name} for names");
}

#[test]
fn numeric_leaf_is_returned_as_text() {
    let (_dir, store) = store_with(&[("en", r#"{"limit": 5}"#)]);

    assert_eq!(store.get("limit", &args! {}).unwrap(), "5");
}

// =========================================================================
// Invalid Paths
// =========================================================================

#[test]
fn empty_path_is_invalid_argument() {
    let (_dir, store) = store_with(&[("en", r#"{"a": "b"}"#)]);

    let err = store.get("", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::InvalidArgument { .. }));
}

#[test]
fn absent_path_is_not_found() {
    let (_dir, store) = store_with(&[("en", r#"{"a": "b"}"#)]);

    let err = store.get("missing", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::MessageNotFound { ref path, .. } if path == "missing"));
}

#[test]
fn walking_past_a_leaf_is_not_found() {
    let (_dir, store) = store_with(&[("en", r#"{"a": "b"}"#)]);

    let err = store.get("a.b", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::MessageNotFound { .. }));
}

#[test]
fn path_naming_a_group_is_not_a_leaf() {
    let (_dir, store) = store_with(&[("en", r#"{"a": {"b": "c"}}"#)]);

    let err = store.get("a", &args! {}).unwrap_err();

    match err {
        LookupError::NotALeafMessage { path, locale } => {
            assert_eq!(path, "a");
            assert_eq!(locale, "en");
        }
        other => panic!("expected not-a-leaf error, got {other:?}"),
    }
}

#[test]
fn malformed_template_is_reported() {
    let (_dir, store) = store_with(&[("en", r#"{"bad": "Hello {name"}"#)]);

    let err = store.get("bad", &args! { "name" => "x" }).unwrap_err();

    assert!(matches!(err, LookupError::InvalidTemplate { ref path, .. } if path == "bad"));
}

#[test]
fn not_found_suggests_close_paths() {
    let (_dir, store) = store_with(&[(
        "en",
        r#"{"greeting": "Hi", "farewell": "Bye", "errors": {"missing": "Gone"}}"#,
    )]);

    let greeting = store.get("greting", &args! {}).unwrap_err();
    let missing = store.get("errors.mising", &args! {}).unwrap_err();

    assert!(matches!(
        greeting,
        LookupError::MessageNotFound { ref suggestions, .. } if suggestions == &["greeting"]
    ));
    assert!(matches!(
        missing,
        LookupError::MessageNotFound { ref suggestions, .. } if suggestions == &["errors.missing"]
    ));
}

// =========================================================================
// Fallback
// =========================================================================

#[test]
fn fallback_used_when_current_lacks_message() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"greeting": "Hello", "farewell": "Bye, {name}"}"#),
        ("fr", r#"{"greeting": "Bonjour"}"#),
    ]);
    store.set_current_locale("fr");
    store.set_fallback("en");

    assert_eq!(store.get("greeting", &args! {}).unwrap(), "Bonjour");
    assert_eq!(
        store.get("farewell", &args! { "name" => "Bob" }).unwrap(),
        "Bye, Bob"
    );
}

#[test]
fn fallback_locale_can_differ_from_english() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"title": "Title"}"#),
        ("fr", r#"{}"#),
        ("de", r#"{"title": "Titel"}"#),
    ]);
    store.set_current_locale("fr");
    store.set_fallback("de");

    assert_eq!(store.get("title", &args! {}).unwrap(), "Titel");
}

#[test]
fn empty_string_leaf_falls_back() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"title": "X"}"#),
        ("fr", r#"{"title": ""}"#),
    ]);
    store.set_current_locale("fr");

    assert_eq!(store.get("title", &args! {}).unwrap(), "X");
}

#[test]
fn null_leaf_falls_back() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"title": "X"}"#),
        ("fr", r#"{"title": null}"#),
    ]);
    store.set_current_locale("fr");

    assert_eq!(store.get("title", &args! {}).unwrap(), "X");
}

#[test]
fn zero_and_false_leaves_fall_back() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"n": "fallback", "flag": "on"}"#),
        ("fr", r#"{"n": 0, "flag": false}"#),
    ]);
    store.set_current_locale("fr");

    assert_eq!(store.get("n", &args! {}).unwrap(), "fallback");
    assert_eq!(store.get("flag", &args! {}).unwrap(), "on");
}

#[test]
fn empty_group_falls_back() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"menu": "Menu"}"#),
        ("fr", r#"{"menu": {}}"#),
    ]);
    store.set_current_locale("fr");

    assert_eq!(store.get("menu", &args! {}).unwrap(), "Menu");
}

#[test]
fn empty_everywhere_is_not_found() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"title": ""}"#),
        ("fr", r#"{"title": ""}"#),
    ]);
    store.set_current_locale("fr");

    let err = store.get("title", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::MessageNotFound { .. }));
}

#[test]
fn fallback_skipped_when_same_as_current() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"title": "Title"}"#),
        ("fr", r#"{}"#),
    ]);
    store.set_current_locale("fr");
    store.set_fallback("fr");

    let err = store.get("title", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::MessageNotFound { .. }));
}

#[test]
fn unregistered_fallback_never_matches() {
    let (_dir, mut store) = store_with(&[("en", r#"{"title": "Title"}"#), ("fr", r#"{}"#)]);
    store.set_current_locale("fr");
    store.set_fallback("de");

    let err = store.get("title", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::MessageNotFound { .. }));
    assert!(!store.is_registered("de"));
}

#[test]
fn unregistered_current_locale_uses_fallback() {
    let (_dir, mut store) = store_with(&[("en", r#"{"title": "Title"}"#)]);
    store.set_current_locale("ja");

    assert_eq!(store.get("title", &args! {}).unwrap(), "Title");
}

#[test]
fn current_group_does_not_fall_back() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"menu": "Menu"}"#),
        ("fr", r#"{"menu": {"open": "Ouvrir"}}"#),
    ]);
    store.set_current_locale("fr");

    let err = store.get("menu", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::NotALeafMessage { ref locale, .. } if locale == "fr"));
}

#[test]
fn fallback_group_is_not_a_leaf() {
    let (_dir, mut store) = store_with(&[
        ("en", r#"{"menu": {"open": "Open"}}"#),
        ("fr", r#"{}"#),
    ]);
    store.set_current_locale("fr");

    let err = store.get("menu", &args! {}).unwrap_err();

    assert!(matches!(err, LookupError::NotALeafMessage { ref locale, .. } if locale == "en"));
}

// =========================================================================
// Raw Access
// =========================================================================

#[test]
fn raw_returns_uninterpolated_text() {
    let (_dir, store) = store_with(&[("en", r#"{"greeting": "Hello, {name}!"}"#)]);

    assert_eq!(store.raw("greeting").unwrap(), "Hello, {name}!");
}

#[test]
fn contains_reports_resolvable_messages() {
    let (_dir, store) = store_with(&[("en", r#"{"a": {"b": "c"}, "empty": ""}"#)]);

    assert!(store.contains("a.b"));
    assert!(!store.contains("a"));
    assert!(!store.contains("empty"));
    assert!(!store.contains(""));
}

// =========================================================================
// End to End
// =========================================================================

#[test]
fn bootstrap_edit_and_reregister() {
    let dir = TempDir::new().unwrap();
    let mut store = CatalogStore::new(dir.path(), "json").unwrap();
    assert!(store.catalog("en").unwrap().as_node().unwrap().is_empty());

    let err = store.get("greeting", &args! {}).unwrap_err();
    assert!(matches!(err, LookupError::MessageNotFound { .. }));

    fs::write(dir.path().join("en.json"), r#"{"greeting":"Hi {who}"}"#).unwrap();
    store.add_locale("en").unwrap();

    assert_eq!(
        store.get("greeting", &args! { "who" => "Bob" }).unwrap(),
        "Hi Bob"
    );
    assert_eq!(store.locales(), ["en"]);
}

#[test]
fn new_locale_file_falls_through_to_fallback() {
    let (dir, mut store) = store_with(&[("en", r#"{"a": "A", "b": {"c": "C"}}"#)]);

    store.add_locale("pt").unwrap();
    store.set_current_locale("pt");

    assert!(dir.path().join("pt.json").exists());
    assert_eq!(store.get("a", &args! {}).unwrap(), "A");
    assert_eq!(store.get("b.c", &args! {}).unwrap(), "C");
}

#[test]
fn repeated_key_in_english_keeps_last_value() {
    let (_dir, store) = store_with(&[("en", r#"{"a": "x", "a": "y"}"#)]);

    assert_eq!(store.get("a", &args! {}).unwrap(), "y");
}

#[test]
fn yaml_merge_keys_resolve_inherited_messages() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("en.yaml"),
        "base: &base\n  ok: OK\ndialog:\n  <<: *base\n  title: T\n",
    )
    .unwrap();
    let store = CatalogStore::new(dir.path(), "yaml").unwrap();

    assert_eq!(store.get("dialog.ok", &args! {}).unwrap(), "OK");
    assert_eq!(store.get("dialog.title", &args! {}).unwrap(), "T");
}
