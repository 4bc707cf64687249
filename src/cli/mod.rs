//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Mascara using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Mascara - sensitive data discovery and anonymization
#[derive(Parser, Debug)]
#[command(name = "mascara")]
#[command(version, about, long_about = None)]
#[command(author = "Mascara Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "mascara.toml", env = "MASCARA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MASCARA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover sensitive columns without touching any data
    Scan(commands::scan::ScanArgs),

    /// Full anonymization flow: scan, preview, confirm, execute
    Run(commands::run::RunArgs),

    /// List existing original→fake mappings
    Mappings(commands::mappings::MappingsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
