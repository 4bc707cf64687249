//! Command implementations
//!
//! Each command returns its process exit code: 0 on success or clean
//! abort, 2 for configuration problems, 4 for connection problems, 5 for
//! fatal errors.

pub mod init;
pub mod mappings;
pub mod run;
pub mod scan;
pub mod validate;

use crate::config::{load_config, MascaraConfig};
use crate::db::PgClient;
use crate::domain::SensitiveColumn;

/// Exit code for configuration errors.
pub(crate) const EXIT_CONFIG: i32 = 2;
/// Exit code for connection errors.
pub(crate) const EXIT_CONNECTION: i32 = 4;
/// Exit code for fatal errors.
pub(crate) const EXIT_FATAL: i32 = 5;

/// Load and validate configuration, reporting failures to the console.
pub(crate) fn load_config_or_report(config_path: &str) -> Result<MascaraConfig, i32> {
    match load_config(config_path) {
        Ok(config) => Ok(config),
        Err(e) => {
            println!("❌ Failed to load configuration file");
            println!("   Error: {}", e);
            Err(EXIT_CONFIG)
        }
    }
}

/// Build a database client and verify connectivity, reporting failures.
pub(crate) async fn connect_or_report(config: &MascaraConfig) -> Result<PgClient, i32> {
    let client = match PgClient::new(config.database.clone()) {
        Ok(client) => client,
        Err(e) => {
            println!("❌ Failed to create database client");
            println!("   Error: {}", e);
            return Err(EXIT_CONFIG);
        }
    };

    if let Err(e) = client.test_connection().await {
        println!("❌ Failed to connect to database");
        println!("   Error: {}", e);
        return Err(EXIT_CONNECTION);
    }

    Ok(client)
}

/// Print discovered columns as a fixed-width table.
pub(crate) fn print_detections(columns: &[SensitiveColumn]) {
    println!(
        "{:<25} {:<20} {:<12} {:<6} {}",
        "Table", "Column", "Type", "Conf", "Sample"
    );
    println!("{}", "-".repeat(90));
    for col in columns {
        println!(
            "{:<25} {:<20} {:<12} {:<6.2} {}",
            col.qualified_table(),
            col.column,
            col.sensitive_type.to_string(),
            col.confidence,
            truncate(&col.sample_value, 27),
        );
    }
}

/// Truncate a value for display, appending `...` when cut.
pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_chars {
        value.to_string()
    } else {
        let head: String = chars[..max_chars].iter().collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value_unchanged() {
        assert_eq!(truncate("short", 27), "short");
    }

    #[test]
    fn test_truncate_long_value() {
        let long = "a".repeat(40);
        let shown = truncate(&long, 27);
        assert_eq!(shown.len(), 30);
        assert!(shown.ends_with("..."));
    }
}
