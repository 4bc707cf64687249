//! Column sensitivity model
//!
//! Core domain types produced by discovery and consumed by the simulation
//! and execution engines: sensitivity labels, normalized SQL type
//! categories, and the per-column descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensitivity category assigned to a column.
///
/// `NonSensitive` means "exclude from anonymization"; every other label is
/// an anonymization target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitivityLabel {
    /// Person names (full names)
    Name,
    /// Email addresses
    Email,
    /// Brazilian CPF or CNPJ documents
    CpfCnpj,
    /// Telephone numbers
    Phone,
    /// Usernames / login identifiers
    Login,
    /// Payment card numbers
    CreditCard,
    /// Opaque secrets (passwords, API tokens)
    Token,
    /// Not regulated data
    NonSensitive,
}

impl SensitivityLabel {
    /// Canonical label order shared by the classifier's training corpus and
    /// its persisted artifact. The artifact stores this list; a mismatch at
    /// load time forces a retrain.
    pub const ALL: [SensitivityLabel; 8] = [
        SensitivityLabel::Name,
        SensitivityLabel::Email,
        SensitivityLabel::CpfCnpj,
        SensitivityLabel::Phone,
        SensitivityLabel::Login,
        SensitivityLabel::CreditCard,
        SensitivityLabel::Token,
        SensitivityLabel::NonSensitive,
    ];

    /// Wire/storage name for the label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Email => "EMAIL",
            Self::CpfCnpj => "CPF_CNPJ",
            Self::Phone => "PHONE",
            Self::Login => "LOGIN",
            Self::CreditCard => "CREDIT_CARD",
            Self::Token => "TOKEN",
            Self::NonSensitive => "NON_SENSITIVE",
        }
    }

    /// Parse a stored label name back into the enum
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NAME" => Some(Self::Name),
            "EMAIL" => Some(Self::Email),
            "CPF_CNPJ" => Some(Self::CpfCnpj),
            "PHONE" => Some(Self::Phone),
            "LOGIN" => Some(Self::Login),
            "CREDIT_CARD" => Some(Self::CreditCard),
            "TOKEN" => Some(Self::Token),
            "NON_SENSITIVE" => Some(Self::NonSensitive),
            _ => None,
        }
    }

    /// Whether the label marks a column as an anonymization target
    pub fn is_sensitive(&self) -> bool {
        !matches!(self, Self::NonSensitive)
    }
}

impl fmt::Display for SensitivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized SQL type category.
///
/// Computed once during column introspection from the declared SQL type
/// string; consumed everywhere else as a typed value instead of repeated
/// string pattern-matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlTypeCategory {
    /// Character data (char, varchar, text, ...)
    Text,
    /// Integer types
    Integer,
    /// Floating point, decimal and monetary types
    Floating,
    /// Everything else (dates, booleans, binary, ...)
    Other,
}

impl SqlTypeCategory {
    /// Classify a declared SQL type string into a category.
    ///
    /// Matches the loose substrings databases actually report
    /// ("character varying", "int8", "numeric(12,2)", "money", ...).
    pub fn from_declared_type(declared: &str) -> Self {
        let t = declared.to_lowercase();
        if t.contains("char") || t.contains("text") || t.contains("string") {
            Self::Text
        } else if t.contains("int") {
            Self::Integer
        } else if t.contains("float")
            || t.contains("real")
            || t.contains("decimal")
            || t.contains("numeric")
            || t.contains("money")
            || t.contains("double")
        {
            Self::Floating
        } else {
            Self::Other
        }
    }
}

/// A column flagged as sensitive by discovery.
///
/// Produced once per scan, immutable afterwards; identity is
/// (schema, table, column).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitiveColumn {
    /// Schema name, absent for databases without schema support
    pub schema: Option<String>,
    /// Table name
    pub table: String,
    /// Column name
    pub column: String,
    /// Declared SQL type as reported by the database
    pub declared_type: String,
    /// Normalized type category, computed during introspection
    pub type_category: SqlTypeCategory,
    /// Declared maximum size (0 when not applicable)
    pub max_size: i64,
    /// Assigned sensitivity label (never `NonSensitive` in scan results)
    pub sensitive_type: SensitivityLabel,
    /// Majority-vote confidence in [0, 1]
    pub confidence: f64,
    /// One sampled value, kept for human review
    pub sample_value: String,
}

impl SensitiveColumn {
    /// "schema.table" when a schema is present, else just the table name
    pub fn qualified_table(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.table),
            None => self.table.clone(),
        }
    }
}

/// Summary statistics for a column, supplied by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnStats {
    /// Fraction of rows where the column is NULL
    pub null_ratio: f64,
    /// Distinct values / total rows
    pub unique_ratio: f64,
    /// Total row count at sampling time
    pub total_rows: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_label_roundtrip() {
        for label in SensitivityLabel::ALL {
            assert_eq!(SensitivityLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(SensitivityLabel::parse("SOMETHING_ELSE"), None);
    }

    #[test]
    fn test_non_sensitive_is_not_a_target() {
        assert!(!SensitivityLabel::NonSensitive.is_sensitive());
        assert!(SensitivityLabel::CpfCnpj.is_sensitive());
    }

    #[test_case("character varying(255)", SqlTypeCategory::Text)]
    #[test_case("TEXT", SqlTypeCategory::Text)]
    #[test_case("bigint", SqlTypeCategory::Integer)]
    #[test_case("numeric(12,2)", SqlTypeCategory::Floating)]
    #[test_case("double precision", SqlTypeCategory::Floating)]
    #[test_case("money", SqlTypeCategory::Floating)]
    #[test_case("timestamp with time zone", SqlTypeCategory::Other)]
    #[test_case("boolean", SqlTypeCategory::Other)]
    fn test_type_category(declared: &str, expected: SqlTypeCategory) {
        assert_eq!(SqlTypeCategory::from_declared_type(declared), expected);
    }

    #[test]
    fn test_qualified_table() {
        let col = SensitiveColumn {
            schema: Some("public".to_string()),
            table: "customers".to_string(),
            column: "email".to_string(),
            declared_type: "text".to_string(),
            type_category: SqlTypeCategory::Text,
            max_size: 0,
            sensitive_type: SensitivityLabel::Email,
            confidence: 1.0,
            sample_value: "a@b.com".to_string(),
        };
        assert_eq!(col.qualified_table(), "public.customers");

        let no_schema = SensitiveColumn {
            schema: None,
            ..col
        };
        assert_eq!(no_schema.qualified_table(), "customers");
    }
}
