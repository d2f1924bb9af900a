//! Experiment configuration, loaded from YAML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The top-level experiment configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the train and test splits live and how to read them
    pub data: DataConfig,

    /// TF-IDF vectorizer settings
    #[serde(default, rename = "tf-idf")]
    pub tfidf: TfidfConfig,

    /// Logistic regression settings
    #[serde(default)]
    pub logreg: LogRegConfig,

    /// Where the fitted pipeline is written
    #[serde(default)]
    pub output: OutputConfig,
}

/// Data loading configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the training split
    pub train_data_path: PathBuf,

    /// Path to the held-out test split
    pub test_data_path: PathBuf,

    /// Field delimiter, a single byte
    #[serde(default = "default_sep")]
    pub sep: String,

    /// Header of the column holding the text
    #[serde(default = "default_text_column")]
    pub text_column: String,

    /// Header of the column holding the class label
    #[serde(default = "default_target_column")]
    pub target_column: String,
}

/// A document frequency bound, either an absolute count or a proportion of documents
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentFrequency {
    /// An absolute number of documents
    Count(usize),

    /// A proportion of the documents, in `[0, 1]`
    Proportion(f64),
}

impl DocumentFrequency {
    /// Resolve the bound to a document count for a corpus of `n_docs` documents
    pub fn to_count(&self, n_docs: usize) -> f64 {
        match self {
            DocumentFrequency::Count(count) => *count as f64,
            DocumentFrequency::Proportion(proportion) => proportion * n_docs as f64,
        }
    }
}

/// TF-IDF vectorizer configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfConfig {
    /// Lowercase text before tokenizing
    pub lowercase: bool,

    /// Inclusive range of word n-gram sizes
    pub ngram_range: (usize, usize),

    /// Ignore terms that appear in fewer documents than this
    pub min_df: DocumentFrequency,

    /// Ignore terms that appear in more documents than this
    pub max_df: DocumentFrequency,

    /// Keep only the most frequent terms
    pub max_features: Option<usize>,

    /// Replace raw term counts with `1 + ln(count)`
    pub sublinear_tf: bool,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            ngram_range: (1, 1),
            min_df: DocumentFrequency::Count(1),
            max_df: DocumentFrequency::Proportion(1.0),
            max_features: None,
            sublinear_tf: false,
        }
    }
}

/// Logistic regression training configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogRegConfig {
    /// Number of full-batch optimization steps
    pub num_epochs: usize,

    /// AdamW learning rate
    pub learning_rate: f64,

    /// AdamW weight decay (L2 penalty)
    pub weight_decay: f32,
}

impl Default for LogRegConfig {
    fn default() -> Self {
        Self {
            num_epochs: 200,
            learning_rate: 0.1,
            weight_decay: 1e-4,
        }
    }
}

/// Output configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// The directory the model artifacts are written to
    pub artifacts_dir: PathBuf,

    /// The file stem of the serialized pipeline
    pub model_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("saved_models/log_reg_tf_idf"),
            model_name: "model".to_string(),
        }
    }
}

fn default_sep() -> String {
    ",".to_string()
}

fn default_text_column() -> String {
    "Text".to_string()
}

fn default_target_column() -> String {
    "Class".to_string()
}

impl Config {
    /// Read and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    /// Serialize the configuration back to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the invariants serde can't express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.sep.len() != 1 {
            return Err(ConfigError::Invalid(format!(
                "sep must be a single byte, got {:?}",
                self.data.sep
            )));
        }

        let (min_n, max_n) = self.tfidf.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ConfigError::Invalid(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        for (name, bound) in [("min_df", self.tfidf.min_df), ("max_df", self.tfidf.max_df)] {
            if let DocumentFrequency::Proportion(p) = bound {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigError::Invalid(format!(
                        "{name} proportion must be within [0, 1], got {p}"
                    )));
                }
            }
        }

        if self.tfidf.max_features == Some(0) {
            return Err(ConfigError::Invalid("max_features must be positive".into()));
        }

        if self.logreg.num_epochs == 0 {
            return Err(ConfigError::Invalid("num_epochs must be positive".into()));
        }

        if self.logreg.learning_rate <= 0.0 {
            return Err(ConfigError::Invalid(
                "learning_rate must be positive".into(),
            ));
        }

        if self.output.model_name.is_empty() {
            return Err(ConfigError::Invalid("model_name must not be empty".into()));
        }

        Ok(())
    }
}

/// Config Error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The config file is not valid YAML for this schema
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// The config parsed but violates an invariant
    #[error("invalid config: {0}")]
    Invalid(String),
}
