//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Mascara error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MascaraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Target database errors (connectivity, introspection, SQL)
    #[error("Database error: {0}")]
    Database(String),

    /// Column classification errors
    #[error("Classification error: {0}")]
    Classification(String),

    /// Mapping store errors
    #[error("Mapping store error: {0}")]
    Mapping(String),

    /// Audit/rollback trail errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Execution engine errors (the run was rolled back)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for MascaraError {
    fn from(err: std::io::Error) -> Self {
        MascaraError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MascaraError {
    fn from(err: serde_json::Error) -> Self {
        MascaraError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MascaraError {
    fn from(err: toml::de::Error) -> Self {
        MascaraError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from rusqlite errors (mapping store backend)
impl From<rusqlite::Error> for MascaraError {
    fn from(err: rusqlite::Error) -> Self {
        MascaraError::Mapping(err.to_string())
    }
}

// Conversion from tokio-postgres errors (target database)
impl From<tokio_postgres::Error> for MascaraError {
    fn from(err: tokio_postgres::Error) -> Self {
        MascaraError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MascaraError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: MascaraError = io_err.into();
        assert!(matches!(err, MascaraError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: MascaraError = json_err.into();
        assert!(matches!(err, MascaraError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: MascaraError = toml_err.into();
        assert!(matches!(err, MascaraError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = MascaraError::Execution("rolled back".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
