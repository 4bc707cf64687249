//! Synthetic training corpus
//!
//! Hand-authored exemplars covering all eight sensitivity labels, each
//! paired with column names chosen to exercise the keyword-flag features
//! and with representative stats/type metadata. The classifier is a
//! deterministic function of this corpus: retraining always reproduces the
//! same parameters.

use crate::domain::{ColumnStats, SensitivityLabel, SqlTypeCategory};

/// One labeled training exemplar.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    /// Sampled value
    pub value: &'static str,
    /// Column name paired with the value
    pub column_name: &'static str,
    /// Declared-type category of the synthetic column
    pub type_category: SqlTypeCategory,
    /// Synthetic column statistics
    pub stats: ColumnStats,
    /// Declared max size
    pub max_size: i64,
    /// Ground-truth label
    pub label: SensitivityLabel,
}

fn varied_stats() -> ColumnStats {
    ColumnStats {
        null_ratio: 0.1,
        unique_ratio: 0.9,
        total_rows: 1000,
    }
}

fn categorical_stats() -> ColumnStats {
    ColumnStats {
        null_ratio: 0.0,
        unique_ratio: 0.05,
        total_rows: 1000,
    }
}

/// Build the full corpus.
pub fn corpus() -> Vec<TrainingExample> {
    let mut examples = Vec::new();

    let mut add = |value: &'static str,
                   column_name: &'static str,
                   type_category: SqlTypeCategory,
                   stats: ColumnStats,
                   max_size: i64,
                   label: SensitivityLabel| {
        examples.push(TrainingExample {
            value,
            column_name,
            type_category,
            stats,
            max_size,
            label,
        });
    };

    // EMAIL
    for value in ["john.doe@gmail.com", "jane@corp.co", "contact@site.org", "a.b@c.com"] {
        for column in ["email", "user_email", "contato"] {
            add(value, column, SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::Email);
        }
    }

    // CPF/CNPJ
    for value in ["123.456.789-00", "111.222.333-44", "98765432100", "12345678900"] {
        for column in ["cpf", "documento"] {
            add(value, column, SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::CpfCnpj);
        }
    }
    for value in ["12.345.678/0001-90", "04.252.011/0001-10"] {
        for column in ["cnpj", "documento"] {
            add(value, column, SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::CpfCnpj);
        }
    }

    // NAME
    for value in ["John Doe", "Maria Silva", "Jose Santos", "Ana Souza"] {
        for column in ["name", "full_name", "nome_completo", "cliente"] {
            add(value, column, SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::Name);
        }
    }

    // PHONE
    for value in ["(11) 99999-9999", "11999999999", "+5511988887777", "3333-4444"] {
        for column in ["phone", "telefone", "celular"] {
            add(value, column, SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::Phone);
        }
    }

    // CREDIT_CARD
    for value in ["1234-5678-1234-5678", "4444555566667777", "1234 5678 1234 5678"] {
        for column in ["credit_card", "cartao", "cc_num"] {
            add(value, column, SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::CreditCard);
        }
    }

    // LOGIN
    for value in ["user123", "admin", "jsmith", "root"] {
        add(value, "login", SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::Login);
        add(value, "username", SqlTypeCategory::Text, varied_stats(), 50, SensitivityLabel::Login);
    }

    // TOKEN
    for value in ["akjsdhf78234", "TOKEN_123", "eyJhbGciOiJIUzI1NiIs"] {
        add(value, "token", SqlTypeCategory::Text, varied_stats(), 2000, SensitivityLabel::Token);
        add(value, "access_token", SqlTypeCategory::Text, varied_stats(), 255, SensitivityLabel::Token);
    }

    // NON_SENSITIVE: status codes, dates, amounts, ids, free text
    for value in [
        "ACTIVE",
        "PENDING",
        "2023-01-01",
        "100.50",
        "Category A",
        "Product 1",
        "Yes",
        "No",
        "0",
        "1",
    ] {
        add(value, "status", SqlTypeCategory::Text, categorical_stats(), 20, SensitivityLabel::NonSensitive);
        add(value, "created_at", SqlTypeCategory::Other, varied_stats(), 255, SensitivityLabel::NonSensitive);
        add(value, "amount", SqlTypeCategory::Floating, varied_stats(), 10, SensitivityLabel::NonSensitive);
        add(value, "id", SqlTypeCategory::Integer, varied_stats(), 4, SensitivityLabel::NonSensitive);
        add(value, "description", SqlTypeCategory::Text, varied_stats(), 0, SensitivityLabel::NonSensitive);
    }

    examples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_covers_all_labels() {
        let examples = corpus();
        for label in SensitivityLabel::ALL {
            assert!(
                examples.iter().any(|e| e.label == label),
                "no exemplar for {label}"
            );
        }
    }

    #[test]
    fn test_corpus_is_stable() {
        // Two builds of the corpus are identical; training determinism
        // depends on this.
        let a = corpus();
        let b = corpus();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.value, y.value);
            assert_eq!(x.column_name, y.column_name);
            assert_eq!(x.label, y.label);
        }
    }
}
