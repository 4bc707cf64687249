//! Run command implementation
//!
//! The full interactive anonymization flow: discovery, mapping review,
//! simulation preview and, after an explicit confirmation, the
//! irreversible execution.

use crate::audit::FileAuditSink;
use crate::classifier::Classifier;
use crate::cli::commands::{
    connect_or_report, load_config_or_report, print_detections, truncate, EXIT_FATAL,
};
use crate::db::SchemaInspector;
use crate::discovery::Scanner;
use crate::execution::ExecutionEngine;
use crate::mapping::{FakeValueGenerator, LocaleKey, MappingStore};
use crate::simulation::Simulator;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        println!("=========================================");
        println!("   MASCARA - SENSITIVE DATA ANONYMIZER");
        println!("=========================================");
        println!();

        let config = match load_config_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let client = match connect_or_report(&config).await {
            Ok(client) => client,
            Err(code) => return Ok(code),
        };

        // Phase 1: discovery
        println!("[PHASE 1] Discovery & classification...");
        let classifier = match Classifier::load_or_train(Path::new(&config.classifier.model_path)) {
            Ok(classifier) => classifier,
            Err(e) => {
                println!("❌ Failed to initialize classifier: {}", e);
                return Ok(EXIT_FATAL);
            }
        };
        let inspector = SchemaInspector::new(&client, config.discovery.schema_allowlist.clone());
        let scanner = Scanner::new(&inspector, &classifier, config.discovery.sample_limit);

        let columns = match scanner.scan().await {
            Ok(columns) => columns,
            Err(e) => {
                println!("❌ Scan failed: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        if columns.is_empty() {
            println!("No sensitive columns detected.");
            return Ok(0);
        }

        println!();
        println!("Detected {} sensitive column(s):", columns.len());
        print_detections(&columns);
        println!();

        // Phase 2: mapping review
        println!("[PHASE 2] Existing mappings review...");
        let locale = LocaleKey::parse(&config.application.locale)
            .expect("locale was validated with the configuration");
        let generator = FakeValueGenerator::new(locale);
        let store = match MappingStore::open(Path::new(&config.mapping.store_path), generator) {
            Ok(store) => store,
            Err(e) => {
                println!("❌ Failed to open mapping store: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        match store.list_mappings(100) {
            Ok(mappings) if !mappings.is_empty() => {
                println!("{:<30} | {:<12} | {:<30}", "ORIGINAL", "TYPE", "FAKE");
                println!("{}", "-".repeat(78));
                for entry in &mappings {
                    println!(
                        "{:<30} | {:<12} | {:<30}",
                        truncate(&entry.original_value, 27),
                        entry.sensitivity_type,
                        truncate(&entry.fake_value, 27),
                    );
                }
            }
            Ok(_) => {
                println!("  (No mappings exist yet. They will be generated consistently during execution.)");
            }
            Err(e) => {
                println!("❌ Failed to list mappings: {}", e);
                return Ok(EXIT_FATAL);
            }
        }

        if !self.confirm("Is the mapping sample satisfactory? Abort if not.")? {
            println!("Aborted by user.");
            return Ok(0);
        }

        // Phase 3: simulation
        println!();
        println!(
            "[PHASE 3] Simulation preview (first {} row(s) per table)...",
            config.simulation.rows_per_table
        );
        let simulator = Simulator::new(&client, &store, config.simulation.rows_per_table);
        match simulator.simulate(&columns).await {
            Ok(preview) => {
                let mut current_table = String::new();
                for entry in &preview {
                    if entry.table != current_table {
                        current_table = entry.table.clone();
                        println!();
                        println!("TABLE: {current_table}");
                    }
                    println!(
                        "    {:<20}: {:<25} -> {} ({})",
                        entry.column,
                        truncate(entry.original.as_deref().unwrap_or("NULL"), 22),
                        entry.new.as_deref().unwrap_or("NULL"),
                        entry.sensitive_type,
                    );
                }
            }
            Err(e) => {
                println!("❌ Simulation failed: {}", e);
                return Ok(EXIT_FATAL);
            }
        }

        println!();
        println!("⚠️  You are about to PERMANENTLY modify the database.");
        if !self.confirm("CONFIRM EXECUTION?")? {
            println!("Aborted by user.");
            return Ok(0);
        }

        // Phase 4: execution
        println!();
        println!("[PHASE 4] Execution (applying changes)...");
        let audit = match FileAuditSink::open(
            &config.audit.audit_log_path,
            &config.audit.rollback_log_path,
        ) {
            Ok(audit) => audit,
            Err(e) => {
                println!("❌ Failed to open audit logs: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        let engine = ExecutionEngine::new(&client, &inspector, &store, &audit);
        match engine.execute(&columns).await {
            Ok(summary) => {
                println!();
                for outcome in &summary.tables {
                    if outcome.skipped_no_primary_key {
                        println!(
                            "  ⚠️  {} skipped: no primary key for row addressing",
                            outcome.table
                        );
                    } else {
                        println!("  {} rows updated in {}", outcome.rows_updated, outcome.table);
                    }
                }
                println!();
                println!(
                    "✅ Anonymization completed ({} rows updated).",
                    summary.total_rows_updated()
                );
                println!(
                    "Check '{}' and '{}' for details.",
                    config.audit.audit_log_path, config.audit.rollback_log_path
                );
                Ok(0)
            }
            Err(e) => {
                println!();
                println!("❌ Execution FAILED and was rolled back.");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Ask a yes/no question; `--yes` answers everything affirmatively.
    fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        if self.yes {
            return Ok(true);
        }

        print!("[?] {} [y/N]: ", question);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}
