//! Linear model and feature scaling
//!
//! A small multinomial logistic regression trained by full-batch gradient
//! descent. Weights are zero-initialized and the schedule is fixed, so
//! training is fully deterministic: the same corpus always produces the
//! same parameters, which keeps the persisted artifact reproducible.

use serde::{Deserialize, Serialize};

/// Per-feature standardization (zero mean, unit variance).
///
/// Fit on the training corpus and applied identically at inference time;
/// predicting with un-scaled features breaks calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature standard deviation (1.0 where the feature is constant)
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit mean and standard deviation over the rows.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len().max(1) as f64;

        let mut mean = vec![0.0; n_features];
        for row in rows {
            for (i, value) in row.iter().enumerate() {
                mean[i] += value;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut scale = vec![0.0; n_features];
        for row in rows {
            for (i, value) in row.iter().enumerate() {
                let d = value - mean[i];
                scale[i] += d * d;
            }
        }
        for s in &mut scale {
            *s = (*s / n).sqrt();
            // A constant feature scales to 1.0 so it standardizes to zero
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { mean, scale }
    }

    /// Standardize a single row.
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }

    /// Standardize a batch of rows.
    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

/// Multinomial logistic regression (softmax) over standardized features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxRegression {
    /// One weight row per class, one entry per feature
    pub weights: Vec<Vec<f64>>,
    /// One intercept per class
    pub intercepts: Vec<f64>,
}

/// Fixed training schedule; changing these changes the persisted parameters,
/// so they live next to the artifact version.
const LEARNING_RATE: f64 = 0.3;
const EPOCHS: usize = 1000;

impl SoftmaxRegression {
    /// Train on standardized rows with class indices in `0..n_classes`.
    ///
    /// Full-batch gradient descent on the cross-entropy loss, weights
    /// zero-initialized.
    pub fn train(rows: &[Vec<f64>], labels: &[usize], n_classes: usize) -> Self {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        let n_samples = rows.len().max(1) as f64;

        let mut model = Self {
            weights: vec![vec![0.0; n_features]; n_classes],
            intercepts: vec![0.0; n_classes],
        };

        for _ in 0..EPOCHS {
            let mut weight_grad = vec![vec![0.0; n_features]; n_classes];
            let mut intercept_grad = vec![0.0; n_classes];

            for (row, &label) in rows.iter().zip(labels.iter()) {
                let probs = model.probabilities(row);
                for class in 0..n_classes {
                    let error = probs[class] - if class == label { 1.0 } else { 0.0 };
                    for (feature, value) in row.iter().enumerate() {
                        weight_grad[class][feature] += error * value;
                    }
                    intercept_grad[class] += error;
                }
            }

            for class in 0..n_classes {
                for feature in 0..n_features {
                    model.weights[class][feature] -=
                        LEARNING_RATE * weight_grad[class][feature] / n_samples;
                }
                model.intercepts[class] -= LEARNING_RATE * intercept_grad[class] / n_samples;
            }
        }

        model
    }

    /// Class probabilities for one standardized row.
    pub fn probabilities(&self, row: &[f64]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(self.intercepts.iter())
            .map(|(weights, intercept)| {
                weights
                    .iter()
                    .zip(row.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + intercept
            })
            .collect();

        // Shift by the max logit before exponentiating to stay finite
        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }

    /// Most likely class index for one standardized row.
    pub fn predict(&self, row: &[f64]) -> usize {
        let probs = self.probabilities(row);
        let mut best = 0;
        for (class, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = class;
            }
        }
        best
    }
}
