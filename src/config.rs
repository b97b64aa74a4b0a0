use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/local.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: COMPLAINT_ROUTER_)
            .add_source(
                config::Environment::with_prefix("COMPLAINT_ROUTER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("classifier.known_locations")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

/// Which classification strategy to build at startup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// TF-IDF similarity against inline department profiles
    #[default]
    Profile,
    /// TF-IDF + logistic regression trained from a CSV dataset
    Trained,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Strategy selected at startup
    #[serde(default)]
    pub strategy: StrategyKind,

    /// CSV dataset for the trained strategy
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Cities that boost a department whose profile mentions them
    #[serde(default = "default_known_locations")]
    pub known_locations: Vec<String>,

    /// Weight of the text similarity score
    #[serde(default = "default_text_weight")]
    pub text_weight: f64,

    /// Weight of the location match score
    #[serde(default = "default_location_weight")]
    pub location_weight: f64,

    /// L2 penalty of the trained strategy's logistic regression
    #[serde(default = "default_regularization")]
    pub regularization: f64,

    /// Vectorizer settings
    #[serde(default)]
    pub features: FeatureConfig,
}

impl ClassifierConfig {
    /// Replace the dataset path when one is given, keeping every other setting
    pub fn with_dataset_path(mut self, dataset_path: Option<PathBuf>) -> Self {
        if let Some(path) = dataset_path {
            self.dataset_path = path;
        }
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            dataset_path: default_dataset_path(),
            known_locations: default_known_locations(),
            text_weight: default_text_weight(),
            location_weight: default_location_weight(),
            regularization: default_regularization(),
            features: FeatureConfig::default(),
        }
    }
}

/// Feature extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// N-gram range (min, max)
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Minimum document frequency for terms
    #[serde(default = "default_min_doc_freq")]
    pub min_doc_freq: usize,

    /// Maximum vocabulary size, unbounded when unset
    #[serde(default)]
    pub max_vocab_size: Option<usize>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ngram_range: default_ngram_range(),
            min_doc_freq: default_min_doc_freq(),
            max_vocab_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5001
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset.csv")
}

fn default_known_locations() -> Vec<String> {
    vec!["mumbai".to_string(), "delhi".to_string()]
}

fn default_text_weight() -> f64 {
    0.8
}

fn default_location_weight() -> f64 {
    0.2
}

fn default_regularization() -> f64 {
    1.0
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_min_doc_freq() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "complaint-router".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.http_port, 5001);
        assert_eq!(config.classifier.strategy, StrategyKind::Profile);
        assert_eq!(config.classifier.known_locations, vec!["mumbai", "delhi"]);
        assert_eq!(config.classifier.features.ngram_range, (1, 1));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_embedded_defaults_match_code_defaults() {
        let embedded: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let defaults = Config::default();
        assert_eq!(embedded.server.http_port, defaults.server.http_port);
        assert_eq!(embedded.classifier.strategy, defaults.classifier.strategy);
        assert_eq!(embedded.classifier.dataset_path, defaults.classifier.dataset_path);
        assert_eq!(embedded.classifier.text_weight, defaults.classifier.text_weight);
        assert_eq!(
            embedded.classifier.location_weight,
            defaults.classifier.location_weight
        );
    }

    #[test]
    fn test_dataset_path_override_keeps_other_settings() {
        let config = ClassifierConfig {
            regularization: 500.0,
            ..Default::default()
        };

        let overridden = config
            .clone()
            .with_dataset_path(Some(PathBuf::from("other.csv")));
        assert_eq!(overridden.dataset_path, PathBuf::from("other.csv"));
        assert_eq!(overridden.regularization, 500.0);

        let unchanged = config.with_dataset_path(None);
        assert_eq!(unchanged.dataset_path, PathBuf::from("dataset.csv"));
    }

    #[test]
    fn test_strategy_kind_parsing() {
        let kind: StrategyKind = serde_json::from_str("\"trained\"").unwrap();
        assert_eq!(kind, StrategyKind::Trained);
    }
}
