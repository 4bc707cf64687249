//! Mappings command implementation
//!
//! Read-only export of the original→fake mapping cache for human review.

use crate::cli::commands::{load_config_or_report, truncate, EXIT_FATAL};
use crate::mapping::{FakeValueGenerator, LocaleKey, MappingStore};
use clap::Args;
use std::path::Path;

/// Arguments for the mappings command
#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Maximum number of mappings to display
    #[arg(long, default_value_t = 100)]
    pub limit: usize,
}

impl MappingsArgs {
    /// Execute the mappings command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let locale = LocaleKey::parse(&config.application.locale)
            .expect("locale was validated with the configuration");
        let store = match MappingStore::open(
            Path::new(&config.mapping.store_path),
            FakeValueGenerator::new(locale),
        ) {
            Ok(store) => store,
            Err(e) => {
                println!("❌ Failed to open mapping store: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        let mappings = match store.list_mappings(self.limit) {
            Ok(mappings) => mappings,
            Err(e) => {
                println!("❌ Failed to list mappings: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        if mappings.is_empty() {
            println!("No mappings stored yet.");
            return Ok(0);
        }

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
        println!();
        println!("{} mapping(s) shown.", mappings.len());

        Ok(0)
    }
}
