/// Complaint classification
///
/// This module provides:
/// - TF-IDF text vectorization
/// - Department profile matching over an inline example corpus
/// - A logistic regression pipeline trained from a CSV dataset
/// - Keyword-based severity tiers
/// - The `ComplaintClassifier` strategy interface both models implement

pub mod classifier;
pub mod corpus;
pub mod dataset;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod service;
pub mod severity;

pub use classifier::{Classifier, LogisticRegressionClassifier};
pub use dataset::{load_dataset, read_dataset};
pub use features::TfidfVectorizer;
pub use models::{ModelMetadata, ModelMetrics, TrainingDataset};
pub use pipeline::{TrainedPipeline, TrainingMismatch};
pub use profile::ProfileMatcher;
pub use service::{build_classifier, ComplaintClassifier};
pub use severity::assess_severity;
