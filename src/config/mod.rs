//! Configuration management for Mascara.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Mascara uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `MASCARA_*` environment overrides
//! - Type-safe configuration structs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! locale = "pt_BR"
//!
//! [database]
//! connection_string = "${MASCARA_DB_URL}"
//! max_connections = 10
//!
//! [discovery]
//! sample_limit = 50
//!
//! [audit]
//! audit_log_path = "audit.log"
//! rollback_log_path = "rollback.log"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mascara::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("mascara.toml")?;
//! println!("Sample limit: {}", config.discovery.sample_limit);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuditConfig, ClassifierConfig, DatabaseConfig, DiscoveryConfig,
    LoggingConfig, MappingConfig, MascaraConfig, SimulationConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
