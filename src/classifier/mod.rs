//! Column sensitivity classification
//!
//! This module labels database columns with a [`SensitivityLabel`] by
//! running sampled values through a linear classifier:
//!
//! - **Features**: each sampled value becomes a fixed-order numeric vector
//!   ([`features::FEATURE_ORDER`]) combining lexical measurements,
//!   format-regex flags, column-name keywords and column statistics.
//! - **Model**: multinomial logistic regression over standardized features,
//!   trained offline on the synthetic corpus in [`training`].
//! - **Artifact**: trained parameters persist as a versioned JSON struct
//!   ([`artifact::ModelArtifact`]); an absent, corrupt or incompatible
//!   artifact triggers a synchronous retrain, never a classification error.

pub mod artifact;
pub mod features;
pub mod model;
pub mod training;

use crate::classifier::artifact::ModelArtifact;
use crate::classifier::features::{ColumnContext, FeatureExtractor};
use crate::classifier::model::{SoftmaxRegression, StandardScaler};
use crate::domain::{ColumnStats, Result, SensitivityLabel, SqlTypeCategory};
use std::path::Path;

/// Trained column classifier.
pub struct Classifier {
    extractor: FeatureExtractor,
    scaler: StandardScaler,
    model: SoftmaxRegression,
}

impl Classifier {
    /// Load the persisted artifact if present and structurally valid;
    /// otherwise retrain from the synthetic corpus and overwrite it.
    ///
    /// A bad artifact must not take column classification down: every load
    /// problem degrades to a retrain with a warning.
    pub fn load_or_train(model_path: &Path) -> Result<Self> {
        let extractor = FeatureExtractor::new()?;

        if model_path.exists() {
            match ModelArtifact::load(model_path) {
                Ok(artifact) if artifact.is_compatible() => {
                    tracing::info!(path = %model_path.display(), "Loaded trained model artifact");
                    let (model, scaler) = artifact.into_parts();
                    return Ok(Self {
                        extractor,
                        scaler,
                        model,
                    });
                }
                Ok(_) => {
                    tracing::warn!(
                        path = %model_path.display(),
                        "Model artifact is incompatible with this build, retraining"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        path = %model_path.display(),
                        error = %e,
                        "Failed to load model artifact, retraining"
                    );
                }
            }
        } else {
            tracing::info!(path = %model_path.display(), "No model artifact found, training");
        }

        let classifier = Self::train(extractor);
        let artifact = ModelArtifact::from_parts(&classifier.model, &classifier.scaler);
        if let Err(e) = artifact.save(model_path) {
            // Keep the freshly trained in-memory model even if persisting it failed
            tracing::warn!(path = %model_path.display(), error = %e, "Failed to persist model artifact");
        } else {
            tracing::info!(path = %model_path.display(), "Model trained and saved");
        }

        Ok(classifier)
    }

    /// Train from the synthetic corpus. Deterministic: the corpus is fixed
    /// and the training schedule has no random state.
    fn train(extractor: FeatureExtractor) -> Self {
        let corpus = training::corpus();

        let mut rows = Vec::with_capacity(corpus.len());
        let mut labels = Vec::with_capacity(corpus.len());
        for example in &corpus {
            let ctx = ColumnContext {
                column_name: example.column_name,
                type_category: example.type_category,
                stats: example.stats,
                max_size: example.max_size,
            };
            rows.push(extractor.extract(example.value, &ctx));
            labels.push(label_index(example.label));
        }

        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_all(&rows);
        let model = SoftmaxRegression::train(&scaled, &labels, SensitivityLabel::ALL.len());

        Self {
            extractor,
            scaler,
            model,
        }
    }

    /// Classify a column from its sampled values and metadata.
    ///
    /// Each sample is predicted independently; the column label is the
    /// majority vote and the confidence is the majority share. An empty
    /// sample set is `NON_SENSITIVE` with confidence 1.0: absence of data
    /// is not evidence of sensitivity.
    pub fn predict(
        &self,
        samples: &[String],
        column_name: &str,
        type_category: SqlTypeCategory,
        stats: &ColumnStats,
        max_size: i64,
    ) -> (SensitivityLabel, f64) {
        if samples.is_empty() {
            return (SensitivityLabel::NonSensitive, 1.0);
        }

        let ctx = ColumnContext {
            column_name,
            type_category,
            stats: *stats,
            max_size,
        };

        let mut votes = [0usize; SensitivityLabel::ALL.len()];
        for sample in samples {
            let features = self.extractor.extract(sample, &ctx);
            let scaled = self.scaler.transform(&features);
            votes[self.model.predict(&scaled)] += 1;
        }

        let mut best = 0;
        for (class, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = class;
            }
        }

        let confidence = votes[best] as f64 / samples.len() as f64;
        (SensitivityLabel::ALL[best], confidence)
    }
}

fn label_index(label: SensitivityLabel) -> usize {
    SensitivityLabel::ALL
        .iter()
        .position(|&l| l == label)
        .expect("label is a member of ALL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn trained() -> Classifier {
        Classifier::train(FeatureExtractor::new().unwrap())
    }

    fn text_stats() -> ColumnStats {
        ColumnStats {
            null_ratio: 0.1,
            unique_ratio: 0.9,
            total_rows: 1000,
        }
    }

    #[test]
    fn test_empty_samples_are_non_sensitive() {
        let classifier = trained();
        let (label, confidence) = classifier.predict(
            &[],
            "email",
            SqlTypeCategory::Text,
            &text_stats(),
            255,
        );
        assert_eq!(label, SensitivityLabel::NonSensitive);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_emails_are_detected() {
        let classifier = trained();
        let samples = vec![
            "alice@example.com".to_string(),
            "bob@corp.co".to_string(),
            "carol@site.org".to_string(),
        ];
        let (label, confidence) =
            classifier.predict(&samples, "email", SqlTypeCategory::Text, &text_stats(), 255);
        assert_eq!(label, SensitivityLabel::Email);
        assert!(confidence > 0.5);
    }

    #[test]
    fn test_formatted_cpf_is_detected() {
        let classifier = trained();
        let samples = vec!["123.456.789-00".to_string(), "987.654.321-00".to_string()];
        let (label, _) =
            classifier.predict(&samples, "cpf", SqlTypeCategory::Text, &text_stats(), 14);
        assert_eq!(label, SensitivityLabel::CpfCnpj);
    }

    #[test]
    fn test_names_are_detected() {
        let classifier = trained();
        let samples = vec!["Maria Silva".to_string(), "Jose Santos".to_string()];
        let (label, _) = classifier.predict(
            &samples,
            "nome_completo",
            SqlTypeCategory::Text,
            &text_stats(),
            255,
        );
        assert_eq!(label, SensitivityLabel::Name);
    }

    #[test]
    fn test_status_codes_are_not_sensitive() {
        let classifier = trained();
        let samples = vec!["ACTIVE".to_string(), "PENDING".to_string()];
        let stats = ColumnStats {
            null_ratio: 0.0,
            unique_ratio: 0.05,
            total_rows: 1000,
        };
        let (label, _) =
            classifier.predict(&samples, "status", SqlTypeCategory::Text, &stats, 20);
        assert_eq!(label, SensitivityLabel::NonSensitive);
    }

    #[test]
    fn test_integer_ids_are_not_sensitive() {
        let classifier = trained();
        let samples = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let (label, _) = classifier.predict(
            &samples,
            "id",
            SqlTypeCategory::Integer,
            &text_stats(),
            4,
        );
        assert_eq!(label, SensitivityLabel::NonSensitive);
    }

    #[test]
    fn test_load_or_train_survives_corrupt_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{\"version\": 999}").unwrap();

        let classifier = Classifier::load_or_train(&path).unwrap();
        let (label, _) = classifier.predict(
            &["alice@example.com".to_string()],
            "email",
            SqlTypeCategory::Text,
            &text_stats(),
            255,
        );
        assert_eq!(label, SensitivityLabel::Email);

        // Artifact was rewritten with a compatible one
        let reloaded = ModelArtifact::load(&path).unwrap();
        assert!(reloaded.is_compatible());
    }

    #[test]
    fn test_trained_and_reloaded_models_agree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        let first = Classifier::load_or_train(&path).unwrap();
        let second = Classifier::load_or_train(&path).unwrap();

        let samples = vec!["(11) 91234-5678".to_string()];
        let a = first.predict(&samples, "telefone", SqlTypeCategory::Text, &text_stats(), 20);
        let b = second.predict(&samples, "telefone", SqlTypeCategory::Text, &text_stats(), 20);
        assert_eq!(a.0, b.0);
    }
}
