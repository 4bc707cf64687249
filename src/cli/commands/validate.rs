//! Validate-config command implementation

use crate::cli::commands::EXIT_CONFIG;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("🔧 Validating configuration: {}", config_path);
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                println!("  locale:           {}", config.application.locale);
                println!("  sample limit:     {}", config.discovery.sample_limit);
                println!("  model path:       {}", config.classifier.model_path);
                println!("  mapping store:    {}", config.mapping.store_path);
                println!("  audit log:        {}", config.audit.audit_log_path);
                println!("  rollback log:     {}", config.audit.rollback_log_path);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {}", e);
                Ok(EXIT_CONFIG)
            }
        }
    }
}
