//! Audit and rollback trail
//!
//! Every applied change is recorded twice: a masked, human-readable audit
//! line and an unmasked, machine-parseable rollback line. The sink is an
//! explicitly constructed object injected into the execution engine and
//! simulator; its lifecycle belongs to the run's top-level orchestrator.

pub mod sink;

pub use sink::{escape_value, mask_value, FileAuditSink};

use crate::domain::Result;

/// Destination for change records.
///
/// Implementations must tolerate malformed values (escape, don't fail);
/// genuine I/O failures are returned as errors because an unrecorded
/// change must never be committed.
pub trait AuditSink: Send + Sync {
    /// Record one applied (or about-to-be-applied) value change.
    fn log_change(
        &self,
        table: &str,
        column: &str,
        row_id: &str,
        original: &str,
        new_value: &str,
    ) -> Result<()>;
}
