use crate::config::{ClassifierConfig, StrategyKind};
use crate::error::{AppError, Result};
use crate::ml::classifier::{Classifier, LogisticRegressionClassifier};
use crate::ml::dataset::load_dataset;
use crate::ml::features::TfidfVectorizer;
use crate::ml::models::{ModelMetadata, ModelMetrics, TrainingDataset};
use crate::ml::service::ComplaintClassifier;
use crate::models::DatasetRow;
use tracing::{debug, info, warn};

/// A dataset row whose recorded department the fitted model does not reproduce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingMismatch {
    pub text: String,
    pub location: String,
    pub expected: String,
    pub predicted: String,
}

/// TF-IDF features feeding a logistic regression, fitted on a labelled
/// dataset. Every row is used for fitting; nothing is held out.
pub struct TrainedPipeline {
    vectorizer: TfidfVectorizer,
    classifier: Box<dyn Classifier>,
    class_names: Vec<String>,
    metadata: ModelMetadata,
}

impl TrainedPipeline {
    /// Load the configured CSV dataset and fit on it
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let rows = load_dataset(&config.dataset_path)?;
        Self::fit(&rows, config)
    }

    /// Fit the vectorizer and classifier on dataset rows
    pub fn fit(rows: &[DatasetRow], config: &ClassifierConfig) -> Result<Self> {
        if rows.is_empty() {
            return Err(AppError::Dataset("no rows to train on".to_string()));
        }

        let documents: Vec<String> = rows.iter().map(DatasetRow::feature_text).collect();
        let labels: Vec<String> = rows.iter().map(|row| row.department.clone()).collect();

        let mut vectorizer = TfidfVectorizer::new(config.features.clone());
        let matrix = vectorizer.fit_transform(&documents)?;
        let dataset = TrainingDataset::new(matrix, &labels)?;

        info!(
            "Training logistic regression on {} rows, {} features, {} departments",
            dataset.n_samples(),
            dataset.n_features(),
            dataset.n_classes()
        );

        let mut classifier: Box<dyn Classifier> =
            Box::new(LogisticRegressionClassifier::new().with_alpha(config.regularization));
        let metrics = classifier.train(&dataset)?;

        Self::report_training_consistency(&metrics, dataset.n_samples());

        let metadata = ModelMetadata {
            strategy: StrategyKind::Trained,
            departments: dataset.class_names.clone(),
            n_training_samples: dataset.n_samples(),
            vocab_size: vectorizer.vocab_size(),
            training_metrics: Some(metrics),
            built_at: chrono::Utc::now(),
        };

        Ok(Self {
            vectorizer,
            classifier,
            class_names: dataset.class_names,
            metadata,
        })
    }

    fn report_training_consistency(metrics: &ModelMetrics, n_samples: usize) {
        // Measured on the rows the model was fitted on
        if metrics.accuracy < 1.0 {
            warn!(
                "Model reproduces only {:.1}% of its {} training labels",
                metrics.accuracy * 100.0,
                n_samples
            );
        } else {
            info!("Model reproduces all {} training labels", n_samples);
        }
        warn!("No held-out split: training accuracy is not a generalization estimate");
    }

    /// Predict departments for many feature strings at once
    pub fn predict_batch<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<String>> {
        let features = self.vectorizer.transform_batch(documents)?;
        self.classifier
            .predict(&features)?
            .into_iter()
            .map(|idx| self.label(idx))
            .collect()
    }

    /// Re-predict dataset rows and collect those whose label is not reproduced.
    ///
    /// Run on the rows the pipeline was fitted on, this is a consistency
    /// check rather than a generalization estimate.
    pub fn training_mismatches(&self, rows: &[DatasetRow]) -> Result<Vec<TrainingMismatch>> {
        let documents: Vec<String> = rows.iter().map(DatasetRow::feature_text).collect();
        let predicted = self.predict_batch(&documents)?;

        Ok(rows
            .iter()
            .zip(predicted)
            .filter(|(row, predicted)| row.department != *predicted)
            .map(|(row, predicted)| TrainingMismatch {
                text: row.text.clone(),
                location: row.location.clone(),
                expected: row.department.clone(),
                predicted,
            })
            .collect())
    }

    fn label(&self, idx: usize) -> Result<String> {
        self.class_names
            .get(idx)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Predicted unknown class index {}", idx)))
    }
}

impl ComplaintClassifier for TrainedPipeline {
    fn predict_department(&self, text: &str, location: &str) -> Result<String> {
        let input = format!("{} {}", text, location);
        let features = self.vectorizer.transform(&input)?;
        let n_features = features.len();
        let matrix = features.into_shape((1, n_features))?;

        let predicted = self
            .classifier
            .predict(&matrix)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Classifier returned no prediction".to_string()))?;

        let department = self.label(predicted)?;
        debug!(department = %department, "Pipeline prediction");
        Ok(department)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
