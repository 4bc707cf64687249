//! Trained-model artifact persistence
//!
//! The trained parameters are a process-wide reusable artifact: an explicit
//! versioned struct rather than an opaque blob. On load, the artifact is
//! checked structurally (version, feature order, label set, parameter
//! shapes); any mismatch is treated as "retrain", never as a fatal error.

use crate::classifier::features::FEATURE_ORDER;
use crate::classifier::model::{SoftmaxRegression, StandardScaler};
use crate::domain::{MascaraError, Result, SensitivityLabel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bumped whenever the feature set, label set or training schedule changes
/// incompatibly.
pub const ARTIFACT_VERSION: u32 = 1;

/// Persisted form of a trained classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact format version
    pub version: u32,
    /// Feature names in extraction order
    pub feature_order: Vec<String>,
    /// Label names in class-index order
    pub labels: Vec<String>,
    /// Per-class weight rows
    pub weights: Vec<Vec<f64>>,
    /// Per-class intercepts
    pub intercepts: Vec<f64>,
    /// Scaler means, one per feature
    pub scaler_mean: Vec<f64>,
    /// Scaler standard deviations, one per feature
    pub scaler_scale: Vec<f64>,
}

impl ModelArtifact {
    /// Bundle trained parameters into a persistable artifact.
    pub fn from_parts(model: &SoftmaxRegression, scaler: &StandardScaler) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            feature_order: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            labels: SensitivityLabel::ALL
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
            weights: model.weights.clone(),
            intercepts: model.intercepts.clone(),
            scaler_mean: scaler.mean.clone(),
            scaler_scale: scaler.scale.clone(),
        }
    }

    /// Read and parse an artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            MascaraError::Classification(format!(
                "Failed to read model artifact {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            MascaraError::Classification(format!(
                "Failed to parse model artifact {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the artifact to disk as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Structural compatibility with the running binary.
    ///
    /// Version, feature order, label set and parameter shapes must all
    /// match; anything else means the artifact was produced by a different
    /// build and predicting with it would silently miscalibrate.
    pub fn is_compatible(&self) -> bool {
        if self.version != ARTIFACT_VERSION {
            return false;
        }
        if self.feature_order.len() != FEATURE_ORDER.len()
            || self
                .feature_order
                .iter()
                .zip(FEATURE_ORDER.iter())
                .any(|(stored, current)| stored != current)
        {
            return false;
        }
        let current_labels: Vec<&str> = SensitivityLabel::ALL.iter().map(|l| l.as_str()).collect();
        if self.labels.len() != current_labels.len()
            || self
                .labels
                .iter()
                .zip(current_labels.iter())
                .any(|(stored, current)| stored != current)
        {
            return false;
        }
        let n_features = FEATURE_ORDER.len();
        let n_classes = current_labels.len();
        self.weights.len() == n_classes
            && self.weights.iter().all(|row| row.len() == n_features)
            && self.intercepts.len() == n_classes
            && self.scaler_mean.len() == n_features
            && self.scaler_scale.len() == n_features
    }

    /// Split the artifact back into usable model parts.
    pub fn into_parts(self) -> (SoftmaxRegression, StandardScaler) {
        (
            SoftmaxRegression {
                weights: self.weights,
                intercepts: self.intercepts,
            },
            StandardScaler {
                mean: self.scaler_mean,
                scale: self.scaler_scale,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dummy_artifact() -> ModelArtifact {
        let n_features = FEATURE_ORDER.len();
        let n_classes = SensitivityLabel::ALL.len();
        ModelArtifact {
            version: ARTIFACT_VERSION,
            feature_order: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            labels: SensitivityLabel::ALL
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
            weights: vec![vec![0.0; n_features]; n_classes],
            intercepts: vec![0.0; n_classes],
            scaler_mean: vec![0.0; n_features],
            scaler_scale: vec![1.0; n_features],
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        let artifact = dummy_artifact();
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert!(loaded.is_compatible());
        assert_eq!(loaded.weights, artifact.weights);
    }

    #[test]
    fn test_version_mismatch_is_incompatible() {
        let mut artifact = dummy_artifact();
        artifact.version = ARTIFACT_VERSION + 1;
        assert!(!artifact.is_compatible());
    }

    #[test]
    fn test_feature_order_mismatch_is_incompatible() {
        let mut artifact = dummy_artifact();
        artifact.feature_order.swap(0, 1);
        assert!(!artifact.is_compatible());
    }

    #[test]
    fn test_shape_mismatch_is_incompatible() {
        let mut artifact = dummy_artifact();
        artifact.weights.pop();
        assert!(!artifact.is_compatible());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert!(ModelArtifact::load(&path).is_err());
    }
}
