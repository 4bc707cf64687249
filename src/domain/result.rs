//! Result type alias for Mascara

use super::errors::MascaraError;

/// Result type alias for Mascara operations
///
/// Convenience alias using `MascaraError` as the error type; use this
/// throughout the codebase for fallible operations.
pub type Result<T> = std::result::Result<T, MascaraError>;
