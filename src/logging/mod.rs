//! Logging and observability
//!
//! This module provides structured process logging with support for:
//! - JSON-formatted file logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! Process logging is distinct from the audit/rollback trail in
//! [`crate::audit`], which is a data contract of its own.
//!
//! # Example
//!
//! ```no_run
//! use mascara::logging::init_logging;
//! use mascara::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
