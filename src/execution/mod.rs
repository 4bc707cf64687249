//! Execution of anonymization runs
//!
//! The engine here is the only component that writes to the target
//! database. One run is one transaction; see [`engine::ExecutionEngine`]
//! for the streaming and rollback semantics.

pub mod engine;

pub use engine::{
    group_by_table, row_identifier, ExecutionEngine, ExecutionSummary, RunState, TableOutcome,
};
