use crate::config::{ClassifierConfig, StrategyKind};
use crate::error::Result;
use crate::ml::corpus::builtin_examples;
use crate::ml::models::ModelMetadata;
use crate::ml::pipeline::TrainedPipeline;
use crate::ml::profile::ProfileMatcher;
use crate::ml::severity::assess_severity;
use crate::models::Classification;
use std::sync::Arc;
use tracing::info;

/// Routes a complaint to a department.
///
/// Implementations are built once at startup and only read afterwards, so a
/// single instance is shared across all requests.
pub trait ComplaintClassifier: Send + Sync {
    /// Predict the responsible department
    fn predict_department(&self, text: &str, location: &str) -> Result<String>;

    /// Describe the underlying model
    fn metadata(&self) -> &ModelMetadata;

    /// Predict the department and assign a severity tier
    fn classify(&self, text: &str, location: &str) -> Result<Classification> {
        Ok(Classification {
            department: self.predict_department(text, location)?,
            severity: assess_severity(text),
        })
    }
}

/// Build the configured classification strategy
pub fn build_classifier(config: &ClassifierConfig) -> Result<Arc<dyn ComplaintClassifier>> {
    info!("Building {:?} classifier", config.strategy);

    let classifier: Arc<dyn ComplaintClassifier> = match config.strategy {
        StrategyKind::Profile => Arc::new(ProfileMatcher::build(&builtin_examples(), config)?),
        StrategyKind::Trained => {
            info!("Loading dataset from {}", config.dataset_path.display());
            Arc::new(TrainedPipeline::from_config(config)?)
        }
    };

    info!(
        "✅ Classifier ready: {} departments, {} terms",
        classifier.metadata().departments.len(),
        classifier.metadata().vocab_size
    );

    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Severity;

    #[test]
    fn test_default_strategy_is_profile() {
        let classifier = build_classifier(&ClassifierConfig::default()).unwrap();
        assert_eq!(classifier.metadata().strategy, StrategyKind::Profile);
    }

    #[test]
    fn test_trained_strategy_without_dataset_fails() {
        let config = ClassifierConfig {
            strategy: StrategyKind::Trained,
            dataset_path: "/nonexistent/dataset.csv".into(),
            ..Default::default()
        };

        let err = build_classifier(&config).err().unwrap();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[test]
    fn test_severity_is_independent_of_department() {
        let classifier = build_classifier(&ClassifierConfig::default()).unwrap();
        let result = classifier
            .classify("power outage and garbage overflow", "Pune")
            .unwrap();

        assert_eq!(result.severity, Severity::S);
        assert!(classifier.metadata().departments.contains(&result.department));
    }
}
