//! Simulation preview
//!
//! A read-only dry run over a handful of rows per table, showing the
//! original → fake transformation an execution would apply. The preview
//! deliberately populates the same mapping store the execution engine
//! uses, so previewed values and executed values are guaranteed to be
//! identical.

use crate::db::{quote_ident, PgClient, TableRef};
use crate::domain::{Result, SensitiveColumn, SensitivityLabel};
use crate::execution::group_by_table;
use crate::mapping::MappingStore;

/// One previewed transformation.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    /// Qualified table name
    pub table: String,
    /// Column name
    pub column: String,
    /// Original value (`None` for NULL)
    pub original: Option<String>,
    /// Replacement value (`None` when the original was NULL)
    pub new: Option<String>,
    /// Label the column was flagged with
    pub sensitive_type: SensitivityLabel,
}

/// Read-only impact preview.
pub struct Simulator<'a> {
    client: &'a PgClient,
    store: &'a MappingStore,
    rows_per_table: i64,
}

impl<'a> Simulator<'a> {
    pub fn new(client: &'a PgClient, store: &'a MappingStore, rows_per_table: i64) -> Self {
        Self {
            client,
            store,
            rows_per_table,
        }
    }

    /// Preview the transformation for a few rows of each flagged table.
    ///
    /// The target database is only read; the mapping store is written, by
    /// design. A table that fails to read is reported with a warning and
    /// skipped.
    pub async fn simulate(&self, columns: &[SensitiveColumn]) -> Result<Vec<PreviewEntry>> {
        let grouped = group_by_table(columns);
        let mut entries = Vec::new();

        for (table, table_columns) in &grouped {
            match self.preview_table(table, table_columns).await {
                Ok(mut table_entries) => entries.append(&mut table_entries),
                Err(e) => {
                    tracing::warn!(
                        table = %table.qualified(),
                        error = %e,
                        "Failed to preview table, skipping"
                    );
                }
            }
        }

        Ok(entries)
    }

    async fn preview_table(
        &self,
        table: &TableRef,
        columns: &[&SensitiveColumn],
    ) -> Result<Vec<PreviewEntry>> {
        let select_list: Vec<String> = columns
            .iter()
            .map(|c| format!("{}::text", quote_ident(&c.column)))
            .collect();
        let sql = format!(
            "SELECT {} FROM {} LIMIT $1",
            select_list.join(", "),
            table.quoted()
        );

        let rows = self.client.query(&sql, &[&self.rows_per_table]).await?;
        let qualified = table.qualified();

        let mut entries = Vec::new();
        for row in &rows {
            for (idx, column) in columns.iter().enumerate() {
                let original: Option<String> = row.get(idx);
                let new = self
                    .store
                    .fake_for_nullable(original.as_deref(), column.sensitive_type)?;
                entries.push(PreviewEntry {
                    table: qualified.clone(),
                    column: column.column.clone(),
                    original,
                    new,
                    sensitive_type: column.sensitive_type,
                });
            }
        }

        Ok(entries)
    }
}
