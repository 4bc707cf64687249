//! Target-database access
//!
//! Connection pooling ([`client::PgClient`]) and read-only schema/data
//! introspection ([`inspector::SchemaInspector`]) for the database being
//! anonymized. Write paths live in [`crate::execution`], which drives its
//! own transaction over a pooled connection.

pub mod client;
pub mod inspector;

pub use client::{quote_ident, PgClient};
pub use inspector::{ColumnInfo, SchemaInspector, TableRef};
