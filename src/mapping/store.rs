//! Persistent anonymization mapping store
//!
//! A durable (original_value, sensitivity_type) → fake_value cache backed
//! by SQLite. The store is what makes anonymization consistent: the same
//! original value always maps to the same fake value, across tables, runs
//! and processes sharing the backing file.
//!
//! Entries are append-only. The store never updates or deletes a mapping;
//! insertion is insert-or-fetch, so two racing writers for the same key
//! converge on a single surviving mapping.

use crate::domain::{MascaraError, Result, SensitivityLabel};
use crate::mapping::generator::FakeValueGenerator;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// One exported mapping row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Original value as stored (stringified)
    pub original_value: String,
    /// Label name the mapping was created under
    pub sensitivity_type: String,
    /// Replacement value
    pub fake_value: String,
}

/// Persistent original→fake mapping cache.
pub struct MappingStore {
    conn: Mutex<Connection>,
    generator: FakeValueGenerator,
}

impl MappingStore {
    /// Open (creating if necessary) the store at `path`.
    pub fn open(path: &Path, generator: FakeValueGenerator) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| MascaraError::Mapping(format!("Failed to open mapping store: {}", e)))?;
        Self::init(conn, generator)
    }

    /// In-memory store for tests.
    pub fn open_in_memory(generator: FakeValueGenerator) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| MascaraError::Mapping(format!("Failed to open mapping store: {}", e)))?;
        Self::init(conn, generator)
    }

    fn init(conn: Connection, generator: FakeValueGenerator) -> Result<Self> {
        // WAL + busy_timeout so a second process sharing the file waits
        // instead of failing on lock contention
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS mapping (
                 original_value   TEXT NOT NULL,
                 sensitivity_type TEXT NOT NULL,
                 fake_value       TEXT NOT NULL,
                 PRIMARY KEY (original_value, sensitivity_type)
             )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            generator,
        })
    }

    /// Return the stable fake value for `original` under `label`.
    ///
    /// Blank input (empty or whitespace-only) passes through unchanged and
    /// is never cached: absent values carry no disclosure risk. Otherwise
    /// the store is consulted; on a miss a fresh fake is generated and
    /// persisted with insert-or-fetch semantics: if another writer created
    /// the same key concurrently, the winner's value is returned.
    pub fn fake_value(&self, original: &str, label: SensitivityLabel) -> Result<String> {
        if original.trim().is_empty() {
            return Ok(original.to_string());
        }

        let type_name = label.as_str();
        let conn = self.lock()?;

        if let Some(existing) = Self::lookup(&conn, original, type_name)? {
            return Ok(existing);
        }

        let candidate = self.generator.generate(label, original);
        conn.execute(
            "INSERT INTO mapping (original_value, sensitivity_type, fake_value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (original_value, sensitivity_type) DO NOTHING",
            params![original, type_name, candidate],
        )?;

        // Read back unconditionally: if the insert lost a race the stored
        // row is the other writer's, and that's the one everyone must use.
        Self::lookup(&conn, original, type_name)?.ok_or_else(|| {
            MascaraError::Mapping(format!(
                "{} mapping vanished after insert",
                type_name
            ))
        })
    }

    /// Nullable-aware variant: `None` stays `None`.
    pub fn fake_for_nullable(
        &self,
        original: Option<&str>,
        label: SensitivityLabel,
    ) -> Result<Option<String>> {
        match original {
            None => Ok(None),
            Some(value) => self.fake_value(value, label).map(Some),
        }
    }

    /// Read-only export of existing mappings for human review.
    /// Order is not guaranteed.
    pub fn list_mappings(&self, limit: usize) -> Result<Vec<MappingEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT original_value, sensitivity_type, fake_value FROM mapping LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(MappingEntry {
                original_value: row.get(0)?,
                sensitivity_type: row.get(1)?,
                fake_value: row.get(2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Number of stored mappings.
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM mapping", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether the store holds no mappings yet.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lookup(conn: &Connection, original: &str, type_name: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT fake_value FROM mapping
             WHERE original_value = ?1 AND sensitivity_type = ?2",
            params![original, type_name],
            |row| row.get(0),
        )
        .optional()
        .map_err(MascaraError::from)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| MascaraError::Mapping("mapping store lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::generator::LocaleKey;
    use tempfile::tempdir;

    fn store() -> MappingStore {
        MappingStore::open_in_memory(FakeValueGenerator::new(LocaleKey::PtBr)).unwrap()
    }

    #[test]
    fn test_repeated_lookups_are_stable() {
        let store = store();
        let first = store
            .fake_value("alice@example.com", SensitivityLabel::Email)
            .unwrap();
        let second = store
            .fake_value("alice@example.com", SensitivityLabel::Email)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_value_different_type_maps_independently() {
        let store = store();
        let as_login = store.fake_value("admin", SensitivityLabel::Login).unwrap();
        let as_name = store.fake_value("admin", SensitivityLabel::Name).unwrap();
        // Two cache keys exist even if the generated values could collide
        assert_eq!(store.len().unwrap(), 2);
        let _ = (as_login, as_name);
    }

    #[test]
    fn test_blank_values_pass_through_uncached() {
        let store = store();
        assert_eq!(store.fake_value("", SensitivityLabel::Name).unwrap(), "");
        assert_eq!(
            store.fake_value("   ", SensitivityLabel::Name).unwrap(),
            "   "
        );
        assert_eq!(
            store
                .fake_for_nullable(None, SensitivityLabel::Name)
                .unwrap(),
            None
        );
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_persistence_across_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mappings.db");
        let generator = FakeValueGenerator::new(LocaleKey::PtBr);

        let first = {
            let store = MappingStore::open(&path, generator).unwrap();
            store
                .fake_value("123.456.789-00", SensitivityLabel::CpfCnpj)
                .unwrap()
        };

        let store = MappingStore::open(&path, generator).unwrap();
        let second = store
            .fake_value("123.456.789-00", SensitivityLabel::CpfCnpj)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_mappings_exports_rows() {
        let store = store();
        store
            .fake_value("alice@example.com", SensitivityLabel::Email)
            .unwrap();
        store
            .fake_value("Maria Silva", SensitivityLabel::Name)
            .unwrap();

        let entries = store.list_mappings(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .any(|e| e.original_value == "alice@example.com" && e.sensitivity_type == "EMAIL"));
    }

    #[test]
    fn test_list_mappings_respects_limit() {
        let store = store();
        for i in 0..5 {
            store
                .fake_value(&format!("user{i}@example.com"), SensitivityLabel::Email)
                .unwrap();
        }
        assert_eq!(store.list_mappings(3).unwrap().len(), 3);
    }
}
