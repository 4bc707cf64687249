//! Consistent anonymization mapping
//!
//! The mapping layer guarantees that a given original value always
//! anonymizes to the same fake value, across tables, across runs and
//! across processes sharing the backing store. It has two halves:
//!
//! - [`generator`] produces locale-appropriate synthetic values per
//!   sensitivity label
//! - [`store`] persists the (original, type) → fake cache with
//!   insert-or-fetch semantics

pub mod generator;
pub mod store;

pub use generator::{FakeValueGenerator, LocaleKey};
pub use store::{MappingEntry, MappingStore};
