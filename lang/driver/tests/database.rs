use std::fs;

use fortpeg_backend::result::BackendError;
use fortpeg_driver::{Database, DriverError, MainError};

const DIGITS: &str = r#"{
    "grammar": {
        "rules": [
            {
                "id": "digits",
                "start": true,
                "body": { "alternatives": [ { "elements": [
                    { "labeled": { "annotated": {
                        "expr": { "class": { "items": [ { "range": { "bottom": "0", "top": "9" } } ] } },
                        "qty": "one_or_more"
                    } } }
                ] } ] }
            }
        ]
    }
}"#;

const BROKEN: &str = r#"{
    "grammar": {
        "rules": [
            {
                "id": "s",
                "start": true,
                "body": { "alternatives": [ { "elements": [
                    { "labeled": { "annotated": { "expr": { "rule_ref": { "target": "nowhere" } } } } }
                ] } ] }
            }
        ]
    }
}"#;

#[test]
fn translate_document_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = dir.path().join("digits.json");
    let config = dir.path().join("fortpeg.toml");
    fs::write(&grammar, DIGITS).unwrap();
    fs::write(&config, "module_name = \"digits_parser\"\n").unwrap();

    let mut db = Database::from_path(&grammar).unwrap();
    db.load_config(&config).unwrap();
    let translation = db.translate().unwrap();

    assert!(translation.source.contains("module digits_parser"));
    assert!(translation.source.contains("recursive function peg_digits(res) result(accept)"));
    assert!(translation.actions.is_empty());
}

#[test]
fn unresolved_reference_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = dir.path().join("broken.json");
    fs::write(&grammar, BROKEN).unwrap();

    let db = Database::from_path(&grammar).unwrap();
    let errs = db.translate().unwrap_err();
    assert_eq!(errs.0.len(), 1);
    match &errs.0[0] {
        MainError::Backend(BackendError::UnresolvedRuleReferences(refs)) => {
            assert_eq!(refs.len(), 1);
            assert_eq!(refs[0].target, "nowhere");
        }
        err => panic!("Unexpected error {err}"),
    }

    let reports = db.pretty_errors(errs);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].to_string().contains("1 unresolved rule reference"));
}

#[test]
fn invalid_json_has_position() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = dir.path().join("bad.json");
    fs::write(&grammar, "{\n  \"grammar\": [\n").unwrap();

    match Database::from_path(&grammar) {
        Err(DriverError::InvalidDocument { line, .. }) => assert!(line >= 2),
        Err(err) => panic!("Unexpected error {err}"),
        Ok(_) => panic!("Expected an error"),
    }
}
