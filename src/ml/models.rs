use crate::config::StrategyKind;
use crate::error::{AppError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Describes the model a running service classifies with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Strategy that built the model
    pub strategy: StrategyKind,

    /// Department labels the model can return
    pub departments: Vec<String>,

    /// Number of examples or rows the model was built from
    pub n_training_samples: usize,

    /// Size of the fitted vocabulary
    pub vocab_size: usize,

    /// Metrics measured on the training data itself (trained strategy only).
    /// There is no held-out split, so these are a consistency check.
    pub training_metrics: Option<ModelMetrics>,

    /// Construction timestamp
    pub built_at: chrono::DateTime<chrono::Utc>,
}

/// Model evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub per_class_metrics: HashMap<String, ClassMetrics>,
}

impl ModelMetrics {
    pub fn new() -> Self {
        Self {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
            per_class_metrics: HashMap::new(),
        }
    }

    /// Compute accuracy and macro-averaged metrics from label indices
    pub fn from_predictions(y_true: &[usize], y_pred: &[usize], class_names: &[String]) -> Self {
        let n_samples = y_true.len();
        let n_classes = class_names.len();
        if n_samples == 0 || n_classes == 0 {
            return Self::new();
        }

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t == p)
            .count();
        let accuracy = correct as f64 / n_samples as f64;

        let mut per_class = HashMap::new();

        for (class_idx, class_name) in class_names.iter().enumerate() {
            let tp = y_true
                .iter()
                .zip(y_pred.iter())
                .filter(|(t, p)| **t == class_idx && **p == class_idx)
                .count();

            let fp = y_pred
                .iter()
                .zip(y_true.iter())
                .filter(|(p, t)| **p == class_idx && **t != class_idx)
                .count();

            let fn_count = y_true
                .iter()
                .zip(y_pred.iter())
                .filter(|(t, p)| **t == class_idx && **p != class_idx)
                .count();

            let precision = if tp + fp > 0 {
                tp as f64 / (tp + fp) as f64
            } else {
                0.0
            };

            let recall = if tp + fn_count > 0 {
                tp as f64 / (tp + fn_count) as f64
            } else {
                0.0
            };

            let f1_score = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            let support = y_true.iter().filter(|&&t| t == class_idx).count();

            per_class.insert(
                class_name.clone(),
                ClassMetrics {
                    precision,
                    recall,
                    f1_score,
                    support,
                },
            );
        }

        let n = n_classes as f64;
        Self {
            accuracy,
            precision: per_class.values().map(|m| m.precision).sum::<f64>() / n,
            recall: per_class.values().map(|m| m.recall).sum::<f64>() / n,
            f1_score: per_class.values().map(|m| m.f1_score).sum::<f64>() / n,
            per_class_metrics: per_class,
        }
    }
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-class metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Feature matrix with one class index per row
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    /// Feature matrix (n_samples × n_features)
    pub features: Array2<f64>,

    /// Class index per sample, into `class_names`
    pub labels: Vec<usize>,

    /// Class names in index order
    pub class_names: Vec<String>,
}

impl TrainingDataset {
    /// Build a dataset, interning string labels in first-appearance order
    pub fn new(features: Array2<f64>, labels: &[String]) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(AppError::Training(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }

        let mut class_names: Vec<String> = Vec::new();
        let indices = labels
            .iter()
            .map(|label| match class_names.iter().position(|c| c == label) {
                Some(idx) => idx,
                None => {
                    class_names.push(label.clone());
                    class_names.len() - 1
                }
            })
            .collect();

        Ok(Self {
            features,
            labels: indices,
            class_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dataset_interns_labels_in_order() {
        let labels = names(&["water", "power", "water", "roads"]);
        let dataset = TrainingDataset::new(Array2::zeros((4, 2)), &labels).unwrap();

        assert_eq!(dataset.class_names, names(&["water", "power", "roads"]));
        assert_eq!(dataset.labels, vec![0, 1, 0, 2]);
        assert_eq!(dataset.n_classes(), 3);
        assert_eq!(dataset.n_samples(), 4);
        assert_eq!(dataset.n_features(), 2);
    }

    #[test]
    fn test_dataset_rejects_length_mismatch() {
        let labels = names(&["water"]);
        assert!(TrainingDataset::new(Array2::zeros((2, 2)), &labels).is_err());
    }

    #[test]
    fn test_metrics_perfect_predictions() {
        let classes = names(&["a", "b"]);
        let metrics = ModelMetrics::from_predictions(&[0, 1, 1], &[0, 1, 1], &classes);

        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
        assert_eq!(metrics.per_class_metrics["b"].support, 2);
    }

    #[test]
    fn test_metrics_partial_predictions() {
        let classes = names(&["a", "b"]);
        let metrics = ModelMetrics::from_predictions(&[0, 0, 1, 1], &[0, 1, 1, 1], &classes);

        assert_eq!(metrics.accuracy, 0.75);
        assert_eq!(metrics.per_class_metrics["a"].recall, 0.5);
        assert!((metrics.per_class_metrics["b"].precision - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_empty() {
        let metrics = ModelMetrics::from_predictions(&[], &[], &[]);
        assert_eq!(metrics.accuracy, 0.0);
        assert!(metrics.per_class_metrics.is_empty());
    }
}
