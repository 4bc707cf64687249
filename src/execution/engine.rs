//! Transactional execution engine
//!
//! Applies the substitutions discovery found, row by row, inside a single
//! transaction covering the whole run. Rows are streamed through a
//! transaction-scoped portal in bounded chunks so memory use stays flat on
//! large tables, and every applied change is recorded through the injected
//! [`AuditSink`] before its UPDATE is issued.
//!
//! Failure semantics are all-or-nothing: any error while streaming,
//! logging or updating rolls back the entire run and re-raises. There is
//! no partial commit.

use crate::audit::AuditSink;
use crate::db::{quote_ident, PgClient, SchemaInspector, TableRef};
use crate::domain::{MascaraError, Result, SensitiveColumn};
use crate::mapping::MappingStore;
use std::collections::BTreeMap;
use tokio_postgres::types::ToSql;
use tokio_postgres::Transaction;

/// Rows fetched per portal round-trip while streaming a table.
const STREAM_CHUNK_ROWS: i32 = 500;

/// Lifecycle of one execution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No transaction opened yet
    NotStarted,
    /// The run transaction is open
    TransactionOpen,
    /// All changes committed
    Committed,
    /// The run failed and every change was rolled back
    RolledBack,
}

/// Outcome of one table within a run.
#[derive(Debug, Clone)]
pub struct TableOutcome {
    /// Qualified table name
    pub table: String,
    /// Rows that received an UPDATE
    pub rows_updated: u64,
    /// True when the table was skipped for lack of a primary key
    pub skipped_no_primary_key: bool,
}

/// Summary of a committed run.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Final state; always `Committed` when returned through `Ok`
    pub state: RunState,
    /// Per-table outcomes, informational only
    pub tables: Vec<TableOutcome>,
}

impl ExecutionSummary {
    /// Total rows updated across all tables.
    pub fn total_rows_updated(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_updated).sum()
    }
}

/// Row-by-row anonymization executor.
pub struct ExecutionEngine<'a> {
    client: &'a PgClient,
    inspector: &'a SchemaInspector<'a>,
    store: &'a MappingStore,
    audit: &'a dyn AuditSink,
}

impl<'a> ExecutionEngine<'a> {
    /// Create an engine. The audit sink is injected; its lifecycle belongs
    /// to the caller.
    pub fn new(
        client: &'a PgClient,
        inspector: &'a SchemaInspector<'a>,
        store: &'a MappingStore,
        audit: &'a dyn AuditSink,
    ) -> Self {
        Self {
            client,
            inspector,
            store,
            audit,
        }
    }

    /// Apply substitutions for all flagged columns in one atomic run.
    ///
    /// # Errors
    ///
    /// Any failure rolls the whole transaction back, so no table keeps its
    /// updates, and the error is returned to the caller.
    pub async fn execute(&self, columns: &[SensitiveColumn]) -> Result<ExecutionSummary> {
        let grouped = group_by_table(columns);
        let mut state = RunState::NotStarted;
        tracing::debug!(state = ?state, "Run created");

        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| MascaraError::Execution(format!("Failed to open transaction: {}", e)))?;
        state = RunState::TransactionOpen;
        tracing::info!(state = ?state, "Transaction started");

        let outcomes = match self.process_tables(&tx, &grouped).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback itself failed");
                }
                state = RunState::RolledBack;
                tracing::error!(
                    state = ?state,
                    error = %e,
                    "Execution failed, all changes rolled back"
                );
                return Err(MascaraError::Execution(format!(
                    "{} (all changes rolled back)",
                    e
                )));
            }
        };

        tx.commit()
            .await
            .map_err(|e| MascaraError::Execution(format!("Commit failed: {}", e)))?;
        state = RunState::Committed;
        tracing::info!(state = ?state, "Execution completed, changes committed");

        Ok(ExecutionSummary {
            state,
            tables: outcomes,
        })
    }

    async fn process_tables(
        &self,
        tx: &Transaction<'_>,
        grouped: &[(TableRef, Vec<&SensitiveColumn>)],
    ) -> Result<Vec<TableOutcome>> {
        let mut outcomes = Vec::new();
        for (table, table_columns) in grouped {
            let outcome = self
                .process_table(tx, table, table_columns)
                .await
                .map_err(|e| {
                    MascaraError::Execution(format!(
                        "Run aborted while processing {}: {}",
                        table.qualified(),
                        e
                    ))
                })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn process_table(
        &self,
        tx: &Transaction<'_>,
        table: &TableRef,
        columns: &[&SensitiveColumn],
    ) -> Result<TableOutcome> {
        let qualified = table.qualified();
        tracing::info!(table = %qualified, "Processing table");

        let pk_columns = match self.inspector.get_primary_key(table).await {
            Ok(pk) => pk,
            Err(e) => {
                tracing::warn!(table = %qualified, error = %e, "Primary key lookup failed");
                Vec::new()
            }
        };

        if pk_columns.is_empty() {
            // Without row addressing, a bulk update could not be audited
            // per row; the table is skipped instead.
            tracing::warn!(
                table = %qualified,
                "No primary key found, skipping table (updates require row addressing)"
            );
            return Ok(TableOutcome {
                table: qualified,
                rows_updated: 0,
                skipped_no_primary_key: true,
            });
        }

        let select_sql = build_select(table, &pk_columns, columns);
        let statement = tx
            .prepare(&select_sql)
            .await
            .map_err(|e| MascaraError::Execution(format!("Failed to prepare select: {}", e)))?;
        let portal = tx
            .bind(&statement, &[])
            .await
            .map_err(|e| MascaraError::Execution(format!("Failed to open portal: {}", e)))?;

        let mut rows_updated = 0u64;
        loop {
            let rows = tx
                .query_portal(&portal, STREAM_CHUNK_ROWS)
                .await
                .map_err(|e| MascaraError::Execution(format!("Row stream failed: {}", e)))?;
            if rows.is_empty() {
                break;
            }

            for row in &rows {
                let pk_values: Vec<String> = (0..pk_columns.len())
                    .map(|i| {
                        row.get::<_, Option<String>>(i)
                            .unwrap_or_else(|| "NULL".to_string())
                    })
                    .collect();
                let row_id = row_identifier(&pk_values);

                let mut changes: Vec<(&str, String)> = Vec::new();
                for (offset, column) in columns.iter().enumerate() {
                    let original: Option<String> = row.get(pk_columns.len() + offset);
                    let Some(original) = original else {
                        // NULL stays NULL
                        continue;
                    };

                    let fake = self.store.fake_value(&original, column.sensitive_type)?;
                    if fake != original {
                        self.audit.log_change(
                            &qualified,
                            &column.column,
                            &row_id,
                            &original,
                            &fake,
                        )?;
                        changes.push((column.column.as_str(), fake));
                    }
                }

                if !changes.is_empty() {
                    self.update_row(tx, table, &pk_columns, &pk_values, &changes)
                        .await?;
                    rows_updated += 1;
                }
            }
        }

        tracing::info!(table = %qualified, rows_updated, "Table processed");
        Ok(TableOutcome {
            table: qualified,
            rows_updated,
            skipped_no_primary_key: false,
        })
    }

    async fn update_row(
        &self,
        tx: &Transaction<'_>,
        table: &TableRef,
        pk_columns: &[String],
        pk_values: &[String],
        changes: &[(&str, String)],
    ) -> Result<()> {
        let sql = build_update(table, pk_columns, changes.iter().map(|(name, _)| *name));

        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(changes.len() + pk_values.len());
        for (_, value) in changes {
            params.push(value);
        }
        for value in pk_values {
            params.push(value);
        }

        tx.execute(&sql, &params)
            .await
            .map_err(|e| MascaraError::Execution(format!("Row update failed: {}", e)))?;
        Ok(())
    }
}

/// Group descriptors by their (schema, table) identity, deterministically
/// ordered.
pub fn group_by_table(columns: &[SensitiveColumn]) -> Vec<(TableRef, Vec<&SensitiveColumn>)> {
    let mut grouped: BTreeMap<(Option<String>, String), Vec<&SensitiveColumn>> = BTreeMap::new();
    for column in columns {
        grouped
            .entry((column.schema.clone(), column.table.clone()))
            .or_default()
            .push(column);
    }
    grouped
        .into_iter()
        .map(|((schema, name), cols)| (TableRef { schema, name }, cols))
        .collect()
}

/// Row identifier from primary-key values; composite keys join with `-`.
pub fn row_identifier(pk_values: &[String]) -> String {
    pk_values.join("-")
}

/// SELECT of primary-key columns plus flagged columns, everything cast to
/// text so values compare and log uniformly.
fn build_select(table: &TableRef, pk_columns: &[String], columns: &[&SensitiveColumn]) -> String {
    let select_list: Vec<String> = pk_columns
        .iter()
        .map(|pk| format!("{}::text", quote_ident(pk)))
        .chain(
            columns
                .iter()
                .map(|c| format!("{}::text", quote_ident(&c.column))),
        )
        .collect();
    format!(
        "SELECT {} FROM {}",
        select_list.join(", "),
        table.quoted()
    )
}

/// Single-row UPDATE addressed by the full primary key.
fn build_update<'n>(
    table: &TableRef,
    pk_columns: &[String],
    changed_columns: impl Iterator<Item = &'n str>,
) -> String {
    let mut placeholder = 0usize;
    let set_clause: Vec<String> = changed_columns
        .map(|name| {
            placeholder += 1;
            format!("{} = ${}", quote_ident(name), placeholder)
        })
        .collect();
    let where_clause: Vec<String> = pk_columns
        .iter()
        .map(|pk| {
            placeholder += 1;
            format!("{}::text = ${}", quote_ident(pk), placeholder)
        })
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {}",
        table.quoted(),
        set_clause.join(", "),
        where_clause.join(" AND ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SensitivityLabel, SqlTypeCategory};

    fn descriptor(schema: Option<&str>, table: &str, column: &str) -> SensitiveColumn {
        SensitiveColumn {
            schema: schema.map(str::to_string),
            table: table.to_string(),
            column: column.to_string(),
            declared_type: "text".to_string(),
            type_category: SqlTypeCategory::Text,
            max_size: 0,
            sensitive_type: SensitivityLabel::Email,
            confidence: 1.0,
            sample_value: "a@b.com".to_string(),
        }
    }

    #[test]
    fn test_group_by_table_is_deterministic() {
        let columns = vec![
            descriptor(Some("public"), "users", "email"),
            descriptor(Some("public"), "customers", "email"),
            descriptor(Some("public"), "users", "phone"),
            descriptor(None, "legacy", "cpf"),
        ];
        let grouped = group_by_table(&columns);

        assert_eq!(grouped.len(), 3);
        // BTreeMap: None sorts before Some
        assert_eq!(grouped[0].0.qualified(), "legacy");
        assert_eq!(grouped[1].0.qualified(), "public.customers");
        assert_eq!(grouped[2].0.qualified(), "public.users");
        assert_eq!(grouped[2].1.len(), 2);
    }

    #[test]
    fn test_row_identifier_composite() {
        assert_eq!(row_identifier(&["1".to_string()]), "1");
        assert_eq!(
            row_identifier(&["1".to_string(), "abc".to_string()]),
            "1-abc"
        );
    }

    #[test]
    fn test_build_select_casts_everything_to_text() {
        let table = TableRef {
            schema: Some("public".to_string()),
            name: "customers".to_string(),
        };
        let col = descriptor(Some("public"), "customers", "email");
        let sql = build_select(&table, &["id".to_string()], &[&col]);
        assert_eq!(
            sql,
            "SELECT \"id\"::text, \"email\"::text FROM \"public\".\"customers\""
        );
    }

    #[test]
    fn test_build_update_addresses_exactly_one_row() {
        let table = TableRef {
            schema: None,
            name: "customers".to_string(),
        };
        let sql = build_update(
            &table,
            &["id".to_string(), "tenant".to_string()],
            ["email", "phone"].into_iter(),
        );
        assert_eq!(
            sql,
            "UPDATE \"customers\" SET \"email\" = $1, \"phone\" = $2 \
             WHERE \"id\"::text = $3 AND \"tenant\"::text = $4"
        );
    }
}
