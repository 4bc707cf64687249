// Mascara - Sensitive Data Discovery and Anonymization
// Copyright (c) 2025 Mascara Contributors
// Licensed under the MIT License

//! # Mascara - Sensitive Data Discovery and Anonymization
//!
//! Mascara discovers personally-identifiable and regulated data (PII/PCI)
//! inside a relational database, replaces it with realistic synthetic
//! substitutes, and applies the substitution transactionally while
//! preserving an auditable, manually reversible trail.
//!
//! ## Overview
//!
//! A run moves through four phases:
//! - **Discovery**: sample every column, classify it with a trained linear
//!   model, and collect the sensitive ones
//! - **Mapping review**: show the existing original→fake cache
//! - **Simulation**: preview the transformation on a few rows per table
//! - **Execution**: stream each flagged table and apply single-row updates
//!   inside one atomic transaction, emitting audit and rollback records
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`discovery`] / [`classifier`] - Column scanning and sensitivity labeling
//! - [`mapping`] - Consistent original→fake value cache and generation
//! - [`simulation`] / [`execution`] - Preview and transactional apply
//! - [`audit`] - Masked audit log and unmasked rollback log
//! - [`db`] - Target-database pooling and introspection
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured process logging
//!
//! ## Consistency guarantee
//!
//! The mapping store persists every (original value, sensitivity type) →
//! fake value pair it generates. The same CPF appearing in two tables, or
//! in two runs years apart against the same store, always anonymizes to
//! the same fake value:
//!
//! ```rust
//! use mascara::domain::SensitivityLabel;
//! use mascara::mapping::{FakeValueGenerator, LocaleKey, MappingStore};
//!
//! # fn example() -> mascara::domain::Result<()> {
//! let store = MappingStore::open_in_memory(FakeValueGenerator::new(LocaleKey::PtBr))?;
//! let first = store.fake_value("123.456.789-00", SensitivityLabel::CpfCnpj)?;
//! let second = store.fake_value("123.456.789-00", SensitivityLabel::CpfCnpj)?;
//! assert_eq!(first, second);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Mascara uses the [`domain::MascaraError`] type for all errors:
//!
//! ```rust,no_run
//! use mascara::domain::MascaraError;
//!
//! fn example() -> Result<(), MascaraError> {
//!     let config = mascara::config::load_config("mascara.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Mascara uses structured logging with the `tracing` crate. The audit and
//! rollback trails are separate, append-only files with stable formats;
//! see [`audit`].

pub mod audit;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod db;
pub mod discovery;
pub mod domain;
pub mod execution;
pub mod logging;
pub mod mapping;
pub mod simulation;
