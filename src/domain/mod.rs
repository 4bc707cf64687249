//! Domain models and types for Mascara.
//!
//! The domain layer provides:
//! - **Sensitivity model** ([`SensitivityLabel`], [`SensitiveColumn`], [`SqlTypeCategory`])
//! - **Error types** ([`MascaraError`])
//! - **Result type alias** ([`Result`])
//!
//! All fallible operations return [`Result<T, MascaraError>`]:
//!
//! ```rust
//! use mascara::domain::{MascaraError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(MascaraError::Other("something went wrong".to_string()))
//! }
//! ```

pub mod column;
pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use column::{ColumnStats, SensitiveColumn, SensitivityLabel, SqlTypeCategory};
pub use errors::MascaraError;
pub use result::Result;
