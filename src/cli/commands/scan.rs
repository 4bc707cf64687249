//! Scan command implementation
//!
//! Runs discovery only: classifies every column and reports the sensitive
//! ones without reading full tables or writing anything.

use crate::classifier::Classifier;
use crate::cli::commands::{
    connect_or_report, load_config_or_report, print_detections, EXIT_FATAL,
};
use crate::db::SchemaInspector;
use crate::discovery::Scanner;
use clap::Args;
use std::path::Path;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting scan command");

        let config = match load_config_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let client = match connect_or_report(&config).await {
            Ok(client) => client,
            Err(code) => return Ok(code),
        };

        let classifier = match Classifier::load_or_train(Path::new(&config.classifier.model_path)) {
            Ok(classifier) => classifier,
            Err(e) => {
                println!("❌ Failed to initialize classifier");
                println!("   Error: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        let inspector = SchemaInspector::new(&client, config.discovery.schema_allowlist.clone());
        let scanner = Scanner::new(&inspector, &classifier, config.discovery.sample_limit);

        println!("🔍 Scanning for sensitive columns...");
        println!();

        let columns = match scanner.scan().await {
            Ok(columns) => columns,
            Err(e) => {
                println!("❌ Scan failed");
                println!("   Error: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        if columns.is_empty() {
            println!("No sensitive columns detected.");
            return Ok(0);
        }

        println!("Detected {} sensitive column(s):", columns.len());
        println!();
        print_detections(&columns);

        Ok(0)
    }
}
