//! Schema and data introspection
//!
//! Catalog queries the discovery pipeline runs against the target database:
//! table enumeration, column metadata, primary keys, emptiness checks,
//! value sampling and column statistics.
//!
//! Introspection is deliberately forgiving: a schema the role cannot read
//! or a table that fails reflection is skipped with a warning rather than
//! failing the scan.

use crate::db::client::{quote_ident, PgClient};
use crate::domain::{ColumnStats, Result, SqlTypeCategory};

/// A (schema, table) pair as enumerated from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    /// Schema name; `None` means "use the connection's default schema"
    pub schema: Option<String>,
    /// Table name
    pub name: String,
}

impl TableRef {
    /// Display form: "schema.table" or just "table".
    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// Quoted form usable inside generated SQL.
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(&self.name)),
            None => quote_ident(&self.name),
        }
    }
}

/// Column metadata as reported by the catalog.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared SQL type string ("character varying(255)", ...)
    pub declared_type: String,
    /// Normalized type category, computed here once
    pub type_category: SqlTypeCategory,
    /// Declared maximum character length (0 when not applicable)
    pub max_size: i64,
}

/// Read-only introspection facade over the target database.
pub struct SchemaInspector<'a> {
    client: &'a PgClient,
    schema_allowlist: Vec<String>,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(client: &'a PgClient, schema_allowlist: Vec<String>) -> Self {
        Self {
            client,
            schema_allowlist,
        }
    }

    /// Enumerate ordinary tables in user schemas.
    ///
    /// System schemas are excluded; when an allowlist is configured only
    /// those schemas are returned.
    pub async fn list_tables(&self) -> Result<Vec<TableRef>> {
        let rows = self
            .client
            .query(
                "SELECT n.nspname, c.relname
                 FROM pg_class c
                 JOIN pg_namespace n ON n.oid = c.relnamespace
                 WHERE c.relkind IN ('r', 'p')
                   AND n.nspname NOT IN ('pg_catalog', 'information_schema')
                   AND n.nspname NOT LIKE 'pg_toast%'
                   AND n.nspname NOT LIKE 'pg_temp%'
                 ORDER BY n.nspname, c.relname",
                &[],
            )
            .await?;

        let tables = rows
            .into_iter()
            .map(|row| TableRef {
                schema: Some(row.get(0)),
                name: row.get(1),
            })
            .filter(|table| {
                self.schema_allowlist.is_empty()
                    || table
                        .schema
                        .as_ref()
                        .is_some_and(|s| self.schema_allowlist.contains(s))
            })
            .collect();

        Ok(tables)
    }

    /// Whether the table holds no rows.
    ///
    /// Tries a direct count first; on failure falls back to an EXISTS
    /// probe; if both fail the table is reported empty so the scan skips
    /// it rather than risking unsafe access.
    pub async fn is_table_empty(&self, table: &TableRef) -> bool {
        let count_sql = format!("SELECT COUNT(*) FROM {}", table.quoted());
        match self.client.query_one(&count_sql, &[]).await {
            Ok(row) => {
                let count: i64 = row.get(0);
                return count == 0;
            }
            Err(e) => {
                tracing::warn!(
                    table = %table.qualified(),
                    error = %e,
                    "Count query failed, falling back to EXISTS probe"
                );
            }
        }

        let exists_sql = format!("SELECT EXISTS (SELECT 1 FROM {})", table.quoted());
        match self.client.query_one(&exists_sql, &[]).await {
            Ok(row) => {
                let exists: bool = row.get(0);
                !exists
            }
            Err(e) => {
                tracing::warn!(
                    table = %table.qualified(),
                    error = %e,
                    "Emptiness check failed entirely, treating table as empty"
                );
                true
            }
        }
    }

    /// Column metadata for a table, with the type category computed once.
    pub async fn get_columns(&self, table: &TableRef) -> Result<Vec<ColumnInfo>> {
        let rows = self
            .client
            .query(
                "SELECT a.attname,
                        pg_catalog.format_type(a.atttypid, a.atttypmod),
                        ic.character_maximum_length::int4
                 FROM pg_attribute a
                 JOIN pg_class c ON c.oid = a.attrelid
                 JOIN pg_namespace n ON n.oid = c.relnamespace
                 LEFT JOIN information_schema.columns ic
                   ON ic.table_schema = n.nspname
                  AND ic.table_name = c.relname
                  AND ic.column_name = a.attname
                 WHERE n.nspname = COALESCE($1, current_schema())
                   AND c.relname = $2
                   AND a.attnum > 0
                   AND NOT a.attisdropped
                 ORDER BY a.attnum",
                &[&table.schema, &table.name],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let declared_type: String = row.get(1);
                let max_size: Option<i32> = row.get(2);
                ColumnInfo {
                    name: row.get(0),
                    type_category: SqlTypeCategory::from_declared_type(&declared_type),
                    declared_type,
                    max_size: max_size.map(i64::from).unwrap_or(0),
                }
            })
            .collect())
    }

    /// Primary key column names in key order; empty when the table has none.
    pub async fn get_primary_key(&self, table: &TableRef) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(
                "SELECT a.attname
                 FROM pg_index i
                 JOIN pg_class c ON c.oid = i.indrelid
                 JOIN pg_namespace n ON n.oid = c.relnamespace
                 JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY (i.indkey)
                 WHERE i.indisprimary
                   AND n.nspname = COALESCE($1, current_schema())
                   AND c.relname = $2
                 ORDER BY array_position(i.indkey::int2[], a.attnum)",
                &[&table.schema, &table.name],
            )
            .await?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    /// Up to `limit` distinct non-null values of a column, stringified.
    pub async fn sample_column(
        &self,
        table: &TableRef,
        column: &str,
        limit: i64,
    ) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT {col}::text FROM {table} WHERE {col} IS NOT NULL LIMIT $1",
            col = quote_ident(column),
            table = table.quoted(),
        );
        let rows = self.client.query(&sql, &[&limit]).await?;
        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    /// Null ratio, uniqueness ratio and row count for a column.
    ///
    /// Failures degrade to neutral statistics with a warning; stats are a
    /// classification input, not a correctness requirement.
    pub async fn column_stats(&self, table: &TableRef, column: &str) -> ColumnStats {
        let sql = format!(
            "SELECT COUNT(*)::int8,
                    (COUNT(*) FILTER (WHERE {col} IS NULL))::int8,
                    COUNT(DISTINCT {col})::int8
             FROM {table}",
            col = quote_ident(column),
            table = table.quoted(),
        );

        match self.client.query_one(&sql, &[]).await {
            Ok(row) => {
                let total: i64 = row.get(0);
                let nulls: i64 = row.get(1);
                let distincts: i64 = row.get(2);

                if total == 0 {
                    return ColumnStats {
                        null_ratio: 1.0,
                        unique_ratio: 0.0,
                        total_rows: 0,
                    };
                }

                ColumnStats {
                    null_ratio: nulls as f64 / total as f64,
                    unique_ratio: distincts as f64 / total as f64,
                    total_rows: total,
                }
            }
            Err(e) => {
                tracing::warn!(
                    table = %table.qualified(),
                    column,
                    error = %e,
                    "Failed to collect column statistics, using neutral values"
                );
                ColumnStats::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ref_qualified() {
        let with_schema = TableRef {
            schema: Some("public".to_string()),
            name: "customers".to_string(),
        };
        assert_eq!(with_schema.qualified(), "public.customers");
        assert_eq!(with_schema.quoted(), "\"public\".\"customers\"");

        let bare = TableRef {
            schema: None,
            name: "customers".to_string(),
        };
        assert_eq!(bare.qualified(), "customers");
        assert_eq!(bare.quoted(), "\"customers\"");
    }
}
