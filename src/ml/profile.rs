use crate::config::{ClassifierConfig, StrategyKind};
use crate::error::{AppError, Result};
use crate::ml::features::TfidfVectorizer;
use crate::ml::models::ModelMetadata;
use crate::ml::service::ComplaintClassifier;
use crate::models::TrainingExample;
use ndarray::Array1;
use tracing::{debug, info};

/// All example text for one department, vectorized
#[derive(Debug, Clone)]
struct DepartmentProfile {
    department: String,
    /// Lower-cased profile text, searched for known locations
    text: String,
    vector: Array1<f64>,
}

/// Matches complaints against per-department TF-IDF profiles.
///
/// Each department's examples are joined into one profile document. A
/// complaint scores `text_weight * cosine(complaint, profile)` plus
/// `location_weight` when a known city mentioned by the complaint (in its
/// text or location) also appears in the profile. The highest score wins;
/// on equal scores the department whose first example comes earliest in
/// the corpus wins.
#[derive(Debug, Clone)]
pub struct ProfileMatcher {
    vectorizer: TfidfVectorizer,
    profiles: Vec<DepartmentProfile>,
    known_locations: Vec<String>,
    text_weight: f64,
    location_weight: f64,
    metadata: ModelMetadata,
}

impl ProfileMatcher {
    /// Build department profiles from labelled examples
    pub fn build(examples: &[TrainingExample], config: &ClassifierConfig) -> Result<Self> {
        if examples.is_empty() {
            return Err(AppError::Dataset(
                "profile corpus contains no examples".to_string(),
            ));
        }

        // Group by department, keeping first-appearance order
        let mut grouped: Vec<(String, Vec<&str>)> = Vec::new();
        for example in examples {
            match grouped.iter_mut().find(|(dept, _)| *dept == example.department) {
                Some((_, texts)) => texts.push(example.text.as_str()),
                None => grouped.push((example.department.clone(), vec![example.text.as_str()])),
            }
        }

        let documents: Vec<String> = grouped.iter().map(|(_, texts)| texts.join(" ")).collect();

        let mut vectorizer = TfidfVectorizer::new(config.features.clone());
        let vectors = vectorizer.fit_transform(&documents)?;

        let profiles: Vec<DepartmentProfile> = grouped
            .into_iter()
            .zip(documents)
            .zip(vectors.rows())
            .map(|(((department, _), text), vector)| DepartmentProfile {
                department,
                text: text.to_lowercase(),
                vector: vector.to_owned(),
            })
            .collect();

        let metadata = ModelMetadata {
            strategy: StrategyKind::Profile,
            departments: profiles.iter().map(|p| p.department.clone()).collect(),
            n_training_samples: examples.len(),
            vocab_size: vectorizer.vocab_size(),
            training_metrics: None,
            built_at: chrono::Utc::now(),
        };

        info!(
            "Built {} department profiles from {} examples ({} terms)",
            profiles.len(),
            examples.len(),
            vectorizer.vocab_size()
        );

        Ok(Self {
            vectorizer,
            profiles,
            known_locations: config
                .known_locations
                .iter()
                .map(|loc| loc.to_lowercase())
                .filter(|loc| !loc.is_empty())
                .collect(),
            text_weight: config.text_weight,
            location_weight: config.location_weight,
            metadata,
        })
    }

    /// Combined score for every department, in profile order
    pub fn score_departments(&self, text: &str, location: &str) -> Result<Vec<(String, f64)>> {
        let input = self.vectorizer.transform(text)?;

        let text_lower = text.to_lowercase();
        let location_lower = location.to_lowercase();
        let mentioned: Vec<&str> = self
            .known_locations
            .iter()
            .filter(|city| text_lower.contains(city.as_str()) || location_lower.contains(city.as_str()))
            .map(String::as_str)
            .collect();

        Ok(self
            .profiles
            .iter()
            .map(|profile| {
                let text_score = input.dot(&profile.vector);
                let location_score = if mentioned.iter().any(|city| profile.text.contains(city)) {
                    1.0
                } else {
                    0.0
                };
                (
                    profile.department.clone(),
                    self.text_weight * text_score + self.location_weight * location_score,
                )
            })
            .collect())
    }
}

impl ComplaintClassifier for ProfileMatcher {
    fn predict_department(&self, text: &str, location: &str) -> Result<String> {
        let scores = self.score_departments(text, location)?;

        // Strict comparison keeps the earliest department on ties
        let mut best: Option<(String, f64)> = None;
        for (department, score) in scores {
            let better = best
                .as_ref()
                .map_or(true, |(_, best_score)| score > *best_score);
            if better {
                best = Some((department, score));
            }
        }

        let (department, score) =
            best.ok_or_else(|| AppError::Internal("no department profiles".to_string()))?;
        debug!(department = %department, score, "Profile match");
        Ok(department)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::corpus::builtin_examples;
    use crate::models::Severity;

    fn matcher() -> ProfileMatcher {
        ProfileMatcher::build(&builtin_examples(), &ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_profiles_follow_first_appearance_order() {
        let matcher = matcher();
        assert_eq!(
            matcher.metadata().departments,
            vec![
                "State Electricity Board",
                "State Water Supply",
                "District Waste Management",
                "State Public Works",
                "Central Transport Authority",
            ]
        );
        assert_eq!(matcher.metadata().n_training_samples, 9);
    }

    #[test]
    fn test_transformer_explosion_in_delhi() {
        let result = matcher()
            .classify("transformer exploded, immediate help needed in Delhi", "Delhi")
            .unwrap();

        assert_eq!(result.department, "State Electricity Board");
        assert_eq!(result.severity, Severity::S);
    }

    #[test]
    fn test_uncollected_garbage_in_pune() {
        let result = matcher()
            .classify("garbage not collected on my street", "Pune")
            .unwrap();

        assert_eq!(result.department, "District Waste Management");
        assert_eq!(result.severity, Severity::B);
    }

    #[test]
    fn test_location_boosts_department_mentioning_city() {
        let matcher = matcher();
        let without = matcher.score_departments("problem", "Pune").unwrap();
        let with = matcher.score_departments("problem", "Mumbai").unwrap();

        // Only the water supply profile mentions Mumbai
        assert_eq!(with[1].0, "State Water Supply");
        assert!((with[1].1 - without[1].1 - 0.2).abs() < 1e-9);
        assert_eq!(with[0].1, without[0].1);
    }

    #[test]
    fn test_tie_resolves_to_earliest_department() {
        // Nothing in the vocabulary and no known city: every score is zero
        let result = matcher().classify("cat meows loudly", "Pune").unwrap();

        assert_eq!(result.department, "State Electricity Board");
        assert_eq!(result.severity, Severity::C);
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        assert!(ProfileMatcher::build(&[], &ClassifierConfig::default()).is_err());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let matcher = matcher();
        let first = matcher.classify("sewage overflow near the school", "Mumbai").unwrap();
        let second = matcher.classify("sewage overflow near the school", "Mumbai").unwrap();
        assert_eq!(first, second);
    }
}
