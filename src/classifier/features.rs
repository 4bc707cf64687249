//! Feature extraction for column classification
//!
//! Each sampled value is turned into a fixed-order numeric vector combining
//! lexical measurements, format-regex flags, column-name keyword flags,
//! contextual statistics and declared-type information. The order and count
//! of features is a contract shared with the persisted model artifact:
//! [`FEATURE_ORDER`] is stored in the artifact and a mismatch at load time
//! forces a retrain.

use crate::domain::{ColumnStats, MascaraError, Result, SqlTypeCategory};
use regex::Regex;

/// Ordered feature names. Training and inference both produce vectors in
/// exactly this order.
pub const FEATURE_ORDER: [&str; 22] = [
    "length",
    "pct_digits",
    "pct_alpha",
    "pct_special",
    "shannon_entropy",
    "has_at",
    "has_cpf_format",
    "has_cnpj_format",
    "has_card_format",
    "name_has_email",
    "name_has_name",
    "name_has_cpf",
    "name_has_cnpj",
    "name_has_phone",
    "name_has_login",
    "name_has_token",
    "unique_ratio",
    "null_ratio",
    "is_char",
    "is_int",
    "is_float",
    "log_max_size",
];

/// Everything known about a column besides its sampled values.
#[derive(Debug, Clone)]
pub struct ColumnContext<'a> {
    /// Column name as declared
    pub column_name: &'a str,
    /// Normalized declared-type category
    pub type_category: SqlTypeCategory,
    /// Sampler-provided statistics
    pub stats: ColumnStats,
    /// Declared maximum size (0 when not applicable)
    pub max_size: i64,
}

/// Compiled-once feature extractor.
pub struct FeatureExtractor {
    cpf_format: Regex,
    cnpj_format: Regex,
    card_format: Regex,
}

impl FeatureExtractor {
    /// Compile the format-detection patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            cpf_format: compile(r"\d{3}\.\d{3}\.\d{3}-\d{2}")?,
            cnpj_format: compile(r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}")?,
            card_format: compile(r"\d{4}.?\d{4}.?\d{4}.?\d{4}")?,
        })
    }

    /// Build the feature vector for one sampled value.
    pub fn extract(&self, value: &str, ctx: &ColumnContext<'_>) -> Vec<f64> {
        let chars: Vec<char> = value.chars().collect();
        let length = chars.len();

        let n_digits = chars.iter().filter(|c| c.is_ascii_digit()).count();
        let n_alpha = chars.iter().filter(|c| c.is_alphabetic()).count();
        let n_special = length - n_digits - n_alpha;

        let (pct_digits, pct_alpha, pct_special) = if length > 0 {
            (
                n_digits as f64 / length as f64,
                n_alpha as f64 / length as f64,
                n_special as f64 / length as f64,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let col_lower = ctx.column_name.to_lowercase();

        let name_has_email = flag(col_lower.contains("email") || col_lower.contains("mail"));
        let name_has_name = flag(col_lower.contains("name") || col_lower.contains("nome"));
        let name_has_cpf = flag(col_lower.contains("cpf"));
        let name_has_cnpj = flag(col_lower.contains("cnpj"));
        let name_has_phone = flag(
            col_lower.contains("phone") || col_lower.contains("cel") || col_lower.contains("tel"),
        );
        let name_has_login = flag(col_lower.contains("login") || col_lower.contains("user"));
        let name_has_token = flag(
            col_lower.contains("pass") || col_lower.contains("senh") || col_lower.contains("token"),
        );

        let log_max_size = if ctx.max_size > 0 {
            ((ctx.max_size + 1) as f64).ln()
        } else {
            0.0
        };

        vec![
            length as f64,
            pct_digits,
            pct_alpha,
            pct_special,
            shannon_entropy(&chars),
            flag(value.contains('@')),
            flag(self.cpf_format.is_match(value)),
            flag(self.cnpj_format.is_match(value)),
            flag(self.card_format.is_match(value)),
            name_has_email,
            name_has_name,
            name_has_cpf,
            name_has_cnpj,
            name_has_phone,
            name_has_login,
            name_has_token,
            ctx.stats.unique_ratio,
            ctx.stats.null_ratio,
            flag(ctx.type_category == SqlTypeCategory::Text),
            flag(ctx.type_category == SqlTypeCategory::Integer),
            flag(ctx.type_category == SqlTypeCategory::Floating),
            log_max_size,
        ]
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| MascaraError::Classification(format!("Invalid feature pattern: {}", e)))
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Shannon entropy in bits over the value's character distribution.
fn shannon_entropy(chars: &[char]) -> f64 {
    let length = chars.len();
    if length == 0 {
        return 0.0;
    }

    let mut counts = std::collections::HashMap::new();
    for c in chars {
        *counts.entry(*c).or_insert(0usize) += 1;
    }

    -counts
        .values()
        .map(|&count| {
            let p = count as f64 / length as f64;
            p * p.log2()
        })
        .sum::<f64>()
}
