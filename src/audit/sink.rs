//! File-backed audit sink
//!
//! Writes two append-only trails per change:
//!
//! - the **audit log**, human-readable with fixed-width fields and the
//!   original value masked
//! - the **rollback log**, pipe-delimited with the original value unmasked
//!   (pipes and newlines escaped), the sole mechanism for manually
//!   reconstructing pre-anonymization state

use crate::audit::AuditSink;
use crate::domain::{MascaraError, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Header written once when the rollback log is newly created or empty.
const ROLLBACK_HEADER: &str = "timestamp|table|column|row_id|original_value|new_value";

/// Audit sink writing to a pair of local files.
pub struct FileAuditSink {
    audit_path: PathBuf,
    rollback_path: PathBuf,
}

impl FileAuditSink {
    /// Create a sink for the given audit and rollback paths.
    ///
    /// Parent directories are created; the rollback header is written if
    /// the rollback log does not exist yet or is empty.
    pub fn open(audit_path: impl Into<PathBuf>, rollback_path: impl Into<PathBuf>) -> Result<Self> {
        let sink = Self {
            audit_path: audit_path.into(),
            rollback_path: rollback_path.into(),
        };

        for path in [&sink.audit_path, &sink.rollback_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| {
                        MascaraError::Audit(format!(
                            "Failed to create log directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }
        }

        let needs_header = match fs::metadata(&sink.rollback_path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if needs_header {
            sink.append(&sink.rollback_path, ROLLBACK_HEADER)?;
        }

        Ok(sink)
    }

    fn append(&self, path: &PathBuf, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                MascaraError::Audit(format!("Failed to open {}: {}", path.display(), e))
            })?;
        writeln!(file, "{line}")
            .map_err(|e| MascaraError::Audit(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl AuditSink for FileAuditSink {
    fn log_change(
        &self,
        table: &str,
        column: &str,
        row_id: &str,
        original: &str,
        new_value: &str,
    ) -> Result<()> {
        let timestamp = Utc::now().to_rfc3339();

        let audit_line = format!(
            "{timestamp} | TABLE: {table:<15} | COL: {column:<15} | ID: {row_id:<10} | ORIG: {masked:<20} | NEW: {new_value}",
            masked = mask_value(original),
        );
        self.append(&self.audit_path, &audit_line)?;

        let rollback_line = format!(
            "{timestamp}|{table}|{column}|{row_id}|{orig}|{new}",
            orig = escape_value(original),
            new = escape_value(new_value),
        );
        self.append(&self.rollback_path, &rollback_line)
    }
}

/// Mask an original value for the human-readable audit log.
///
/// Values of four characters or fewer are fully masked; longer values keep
/// the first two and last two characters. Counted in characters, not bytes.
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let prefix: String = chars[..2].iter().collect();
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    format!("{prefix}{}{suffix}", "*".repeat(chars.len() - 4))
}

/// Escape a value for the pipe-delimited rollback log.
///
/// Malformed input must never break a record: field separators and line
/// breaks inside values are escaped instead of rejected.
pub fn escape_value(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case("12345678900", "12*******00" ; "eleven chars keeps edges")]
    #[test_case("abc", "***" ; "short value fully masked")]
    #[test_case("abcd", "****" ; "four chars fully masked")]
    #[test_case("abcde", "ab*de" ; "five chars keeps edges")]
    #[test_case("", "" ; "empty stays empty")]
    fn test_mask_value(input: &str, expected: &str) {
        assert_eq!(mask_value(input), expected);
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        // 5 multibyte characters: edges survive, middle masked
        assert_eq!(mask_value("ááááá"), "áá*áá");
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("a|b"), "a\\|b");
        assert_eq!(escape_value("a\nb"), "a\\nb");
        assert_eq!(escape_value("plain"), "plain");
    }

    #[test]
    fn test_rollback_header_written_once() {
        let dir = tempdir().unwrap();
        let audit = dir.path().join("audit.log");
        let rollback = dir.path().join("rollback.log");

        {
            let sink = FileAuditSink::open(&audit, &rollback).unwrap();
            sink.log_change("customers", "email", "1", "a@b.com", "x@y.com")
                .unwrap();
        }
        // Reopening an existing non-empty log must not duplicate the header
        let _sink = FileAuditSink::open(&audit, &rollback).unwrap();

        let contents = std::fs::read_to_string(&rollback).unwrap();
        let headers = contents
            .lines()
            .filter(|l| *l == ROLLBACK_HEADER)
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_audit_line_masks_original() {
        let dir = tempdir().unwrap();
        let audit = dir.path().join("audit.log");
        let rollback = dir.path().join("rollback.log");

        let sink = FileAuditSink::open(&audit, &rollback).unwrap();
        sink.log_change("customers", "cpf", "1", "12345678900", "987.654.321-00")
            .unwrap();

        let audit_contents = std::fs::read_to_string(&audit).unwrap();
        assert!(audit_contents.contains("12*******00"));
        assert!(!audit_contents.contains("12345678900"));

        // The rollback log keeps the unmasked original
        let rollback_contents = std::fs::read_to_string(&rollback).unwrap();
        assert!(rollback_contents.contains("12345678900"));
    }

    #[test]
    fn test_rollback_values_are_pipe_escaped() {
        let dir = tempdir().unwrap();
        let sink = FileAuditSink::open(
            dir.path().join("audit.log"),
            dir.path().join("rollback.log"),
        )
        .unwrap();
        sink.log_change("t", "c", "1", "weird|value\nwith breaks", "new")
            .unwrap();

        let contents = std::fs::read_to_string(dir.path().join("rollback.log")).unwrap();
        // Header plus exactly one record: the newline inside the value did
        // not split the record
        assert_eq!(contents.lines().count(), 2);
        let record = contents.lines().last().unwrap();
        assert!(record.contains("weird\\|value\\nwith breaks"));
    }
}
