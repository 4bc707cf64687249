//! Sensitive-column discovery
//!
//! Walks every table the connection can see, samples each column and asks
//! the classifier for a sensitivity label. Only columns labeled with a
//! sensitive type make it into the result; columns without evidence (no
//! non-null values to sample) are simply absent, not marked non-sensitive.

use crate::classifier::Classifier;
use crate::db::SchemaInspector;
use crate::domain::{Result, SensitiveColumn};

/// Discovery orchestrator.
pub struct Scanner<'a> {
    inspector: &'a SchemaInspector<'a>,
    classifier: &'a Classifier,
    sample_limit: i64,
}

impl<'a> Scanner<'a> {
    pub fn new(
        inspector: &'a SchemaInspector<'a>,
        classifier: &'a Classifier,
        sample_limit: i64,
    ) -> Self {
        Self {
            inspector,
            classifier,
            sample_limit,
        }
    }

    /// Scan the database for sensitive columns.
    ///
    /// Introspection problems on individual tables or columns degrade to a
    /// warning and a skip; the scan keeps going. Only a failure to
    /// enumerate tables at all is fatal.
    pub async fn scan(&self) -> Result<Vec<SensitiveColumn>> {
        let tables = self.inspector.list_tables().await?;
        tracing::info!(table_count = tables.len(), "Starting scan");

        let mut sensitive_columns = Vec::new();

        for table in &tables {
            if self.inspector.is_table_empty(table).await {
                tracing::info!(table = %table.qualified(), "Skipping empty table");
                continue;
            }

            let columns = match self.inspector.get_columns(table).await {
                Ok(columns) => columns,
                Err(e) => {
                    tracing::warn!(
                        table = %table.qualified(),
                        error = %e,
                        "Failed to read columns, skipping table"
                    );
                    continue;
                }
            };

            for column in columns {
                let samples = match self
                    .inspector
                    .sample_column(table, &column.name, self.sample_limit)
                    .await
                {
                    Ok(samples) => samples,
                    Err(e) => {
                        tracing::warn!(
                            table = %table.qualified(),
                            column = %column.name,
                            error = %e,
                            "Failed to sample column, skipping"
                        );
                        continue;
                    }
                };

                // No evidence, no label: the column is left out entirely
                if samples.is_empty() {
                    continue;
                }

                let stats = self.inspector.column_stats(table, &column.name).await;

                let (label, confidence) = self.classifier.predict(
                    &samples,
                    &column.name,
                    column.type_category,
                    &stats,
                    column.max_size,
                );

                if label.is_sensitive() {
                    tracing::info!(
                        table = %table.qualified(),
                        column = %column.name,
                        label = %label,
                        confidence = format!("{confidence:.2}"),
                        "Detected sensitive column"
                    );
                    sensitive_columns.push(SensitiveColumn {
                        schema: table.schema.clone(),
                        table: table.name.clone(),
                        column: column.name,
                        declared_type: column.declared_type,
                        type_category: column.type_category,
                        max_size: column.max_size,
                        sensitive_type: label,
                        confidence,
                        sample_value: samples[0].clone(),
                    });
                }
            }
        }

        tracing::info!(
            detected = sensitive_columns.len(),
            "Scan finished"
        );
        Ok(sensitive_columns)
    }
}
