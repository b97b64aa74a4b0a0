use crate::error::{AppError, Result};
use crate::ml::models::{ModelMetrics, TrainingDataset};
use ndarray::Array2;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

/// Trait for classifiers over dense feature matrices
pub trait Classifier: Send + Sync {
    /// Train the classifier and report metrics on the training data
    fn train(&mut self, dataset: &TrainingDataset) -> Result<ModelMetrics>;

    /// Predict class indices, one per feature row
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>>;
}

/// Multinomial logistic regression backed by smartcore
pub struct LogisticRegressionClassifier {
    /// Trained model
    model: Option<LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>>,

    /// L2 regularization strength
    alpha: f64,

    /// Number of classes
    n_classes: usize,
}

impl LogisticRegressionClassifier {
    pub fn new() -> Self {
        Self {
            model: None,
            alpha: 0.0,
            n_classes: 0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
        let shape = arr.shape();
        let data: Vec<f64> = arr.iter().copied().collect();
        DenseMatrix::new(shape[0], shape[1], data, false)
    }

    fn vec_to_labels(vec: &[usize]) -> Vec<i32> {
        vec.iter().map(|&x| x as i32).collect()
    }
}

impl Default for LogisticRegressionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for LogisticRegressionClassifier {
    fn train(&mut self, dataset: &TrainingDataset) -> Result<ModelMetrics> {
        if dataset.n_classes() < 2 {
            return Err(AppError::Training(format!(
                "Need at least two departments to train, found {}",
                dataset.n_classes()
            )));
        }

        // Convert to smartcore format
        let x = Self::ndarray_to_densematrix(&dataset.features);
        let y = Self::vec_to_labels(&dataset.labels);

        let params = LogisticRegressionParameters::default().with_alpha(self.alpha);
        let model = LogisticRegression::fit(&x, &y, params).map_err(|e| {
            AppError::Training(format!("Failed to train logistic regression: {}", e))
        })?;

        self.model = Some(model);
        self.n_classes = dataset.n_classes();

        let predictions = self.predict(&dataset.features)?;
        Ok(ModelMetrics::from_predictions(
            &dataset.labels,
            &predictions,
            &dataset.class_names,
        ))
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| AppError::Internal("Model not trained".to_string()))?;

        let x = Self::ndarray_to_densematrix(features);
        let predictions = model
            .predict(&x)
            .map_err(|e| AppError::Internal(format!("Prediction failed: {}", e)))?;

        Ok(predictions.iter().map(|&x| x as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_dataset() -> TrainingDataset {
        let features = array![
            [1.0, 0.0, 0.0],
            [0.9, 0.1, 0.0],
            [0.0, 1.0, 0.0],
            [0.1, 0.9, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.1, 0.9],
        ];
        let labels: Vec<String> = ["power", "power", "water", "water", "roads", "roads"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        TrainingDataset::new(features, &labels).unwrap()
    }

    #[test]
    fn test_logistic_regression_classifier() {
        let dataset = separable_dataset();
        let mut classifier = LogisticRegressionClassifier::new();

        let metrics = classifier.train(&dataset).unwrap();

        assert_eq!(classifier.n_classes(), 3);
        assert_eq!(metrics.accuracy, 1.0);
    }

    #[test]
    fn test_predict_before_train_fails() {
        let classifier = LogisticRegressionClassifier::new();
        assert!(classifier.predict(&Array2::zeros((1, 3))).is_err());
    }

    #[test]
    fn test_single_class_is_rejected() {
        let labels = vec!["power".to_string(), "power".to_string()];
        let dataset = TrainingDataset::new(Array2::eye(2), &labels).unwrap();
        let mut classifier = LogisticRegressionClassifier::new();

        assert!(classifier.train(&dataset).is_err());
    }

    #[test]
    fn test_predictions_are_class_indices() {
        let dataset = separable_dataset();
        let mut classifier = LogisticRegressionClassifier::new();
        classifier.train(&dataset).unwrap();

        let predictions = classifier.predict(&array![[0.0, 0.95, 0.05]]).unwrap();
        assert_eq!(predictions, vec![1]);
    }
}
