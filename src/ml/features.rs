use crate::config::FeatureConfig;
use crate::error::{AppError, Result};
use ndarray::{Array1, Array2};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Tokens of two or more word characters
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// TF-IDF vectorizer over free text
///
/// Vocabulary indices follow alphabetical term order, IDF is smoothed as
/// `ln((1 + n) / (1 + df)) + 1`, and every transformed vector is
/// L2-normalized, so the dot product of two vectors is their cosine
/// similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Configuration
    config: FeatureConfig,

    /// Vocabulary mapping (term -> index)
    vocabulary: HashMap<String, usize>,

    /// Inverse document frequency, indexed like the vocabulary
    idf: Vec<f64>,

    /// Is fitted (vocabulary built)
    is_fitted: bool,
}

impl TfidfVectorizer {
    /// Create a new vectorizer
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the vocabulary and IDF weights on a corpus
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(AppError::Training(
                "Cannot fit vectorizer on an empty corpus".to_string(),
            ));
        }

        // Document frequency per term; BTreeMap keeps terms alphabetical
        let mut term_doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let unique_terms: HashSet<String> =
                self.extract_terms(document.as_ref()).into_iter().collect();
            for term in unique_terms {
                *term_doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let min_df = self.config.min_doc_freq.max(1);
        let mut vocab_list: Vec<(String, usize)> = term_doc_freq
            .into_iter()
            .filter(|(_, freq)| *freq >= min_df)
            .collect();

        if let Some(max_vocab) = self.config.max_vocab_size {
            // Most frequent first; the sort is stable so ties stay alphabetical
            vocab_list.sort_by(|a, b| b.1.cmp(&a.1));
            vocab_list.truncate(max_vocab);
            vocab_list.sort_by(|a, b| a.0.cmp(&b.0));
        }

        if vocab_list.is_empty() {
            return Err(AppError::Training(
                "Corpus produced an empty vocabulary".to_string(),
            ));
        }

        let n_docs = documents.len() as f64;
        self.idf = vocab_list
            .iter()
            .map(|(_, df)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        self.vocabulary = vocab_list
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term, idx))
            .collect();

        self.is_fitted = true;

        Ok(())
    }

    /// Transform one document into an L2-normalized TF-IDF vector
    pub fn transform(&self, text: &str) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(AppError::Internal(
                "TfidfVectorizer must be fitted before transform".to_string(),
            ));
        }

        let mut features = Array1::zeros(self.vocabulary.len());

        for (term, count) in self.count_terms(&self.extract_terms(text)) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                features[idx] = count as f64 * self.idf[idx];
            }
        }

        let norm = features.dot(&features).sqrt();
        if norm > 0.0 {
            features.mapv_inplace(|v| v / norm);
        }

        Ok(features)
    }

    /// Transform several documents into a feature matrix (one row each)
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Result<Array2<f64>> {
        let mut matrix = Array2::zeros((documents.len(), self.vocab_size()));
        for (row, document) in documents.iter().enumerate() {
            matrix.row_mut(row).assign(&self.transform(document.as_ref())?);
        }
        Ok(matrix)
    }

    /// Fit and transform in one step
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Array2<f64>> {
        self.fit(documents)?;
        self.transform_batch(documents)
    }

    /// Extract terms from text
    fn extract_terms(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let words: Vec<&str> = TOKEN_PATTERN.find_iter(&text).map(|m| m.as_str()).collect();

        let min_n = self.config.ngram_range.0.max(1);
        let max_n = self.config.ngram_range.1.max(min_n);
        let mut terms = Vec::new();

        for n in min_n..=max_n {
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }

        terms
    }

    /// Count term occurrences
    fn count_terms(&self, terms: &[String]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for term in terms {
            *counts.entry(term.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// IDF weight of a vocabulary term
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }

    /// Index of a vocabulary term
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Check if fitted
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Get vocabulary size
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }
}
