//! Integration tests for the audit/rollback trail

use mascara::audit::{mask_value, AuditSink, FileAuditSink};
use tempfile::tempdir;

#[test]
fn test_masking_contract() {
    assert_eq!(mask_value("12345678900"), "12*******00");
    assert_eq!(mask_value("abc"), "***");
}

#[test]
fn test_one_change_produces_one_line_in_each_trail() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.log");
    let rollback_path = dir.path().join("rollback.log");

    let sink = FileAuditSink::open(&audit_path, &rollback_path).unwrap();
    sink.log_change(
        "public.customers",
        "email",
        "1",
        "alice@example.com",
        "fake@example.org",
    )
    .unwrap();

    let audit = std::fs::read_to_string(&audit_path).unwrap();
    assert_eq!(audit.lines().count(), 1);
    let audit_line = audit.lines().next().unwrap();
    assert!(audit_line.contains("TABLE: public.customers"));
    assert!(audit_line.contains("COL: email"));
    // The audit trail never carries the plaintext original
    assert!(!audit_line.contains("alice@example.com"));
    assert!(audit_line.contains("al*************om"));

    let rollback = std::fs::read_to_string(&rollback_path).unwrap();
    // Header plus one record
    assert_eq!(rollback.lines().count(), 2);
    assert_eq!(
        rollback.lines().next().unwrap(),
        "timestamp|table|column|row_id|original_value|new_value"
    );
    let record = rollback.lines().nth(1).unwrap();
    assert!(record.ends_with("|public.customers|email|1|alice@example.com|fake@example.org"));
}

#[test]
fn test_rollback_log_accumulates_across_sink_instances() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.log");
    let rollback_path = dir.path().join("rollback.log");

    {
        let sink = FileAuditSink::open(&audit_path, &rollback_path).unwrap();
        sink.log_change("t", "c", "1", "first", "a").unwrap();
    }
    {
        let sink = FileAuditSink::open(&audit_path, &rollback_path).unwrap();
        sink.log_change("t", "c", "2", "second", "b").unwrap();
    }

    let rollback = std::fs::read_to_string(&rollback_path).unwrap();
    let lines: Vec<&str> = rollback.lines().collect();
    // One header, two records, in order
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("|1|first|"));
    assert!(lines[2].contains("|2|second|"));
}

#[test]
fn test_malformed_values_are_escaped_not_rejected() {
    let dir = tempdir().unwrap();
    let sink = FileAuditSink::open(
        dir.path().join("audit.log"),
        dir.path().join("rollback.log"),
    )
    .unwrap();

    // Values carrying the field separator and line breaks must still
    // produce a single well-formed record
    sink.log_change("t", "c", "1", "bad|value\nline", "new|value")
        .unwrap();

    let rollback = std::fs::read_to_string(dir.path().join("rollback.log")).unwrap();
    assert_eq!(rollback.lines().count(), 2);
    let record = rollback.lines().nth(1).unwrap();
    assert!(record.contains("bad\\|value\\nline"));
    assert!(record.contains("new\\|value"));
}
