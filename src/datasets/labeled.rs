use std::path::Path;

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{config::DataConfig, pipelines::text_classification};

use super::DatasetError;

/// A single labeled text example
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Example {
    /// The text for classification
    pub text: String,

    /// The class name of the text
    pub label: String,
}

impl text_classification::Item for Example {
    fn input(&self) -> &str {
        &self.text
    }

    fn class_label(&self) -> &str {
        &self.label
    }
}

/// An in-memory labeled text dataset
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    /// Read a delimited file, picking the text and label columns by header name
    pub fn load(path: impl AsRef<Path>, config: &DataConfig) -> Result<Self, DatasetError> {
        let path = path.as_ref();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter(&config.sep)?)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let text_index = column_index(&headers, &config.text_column, path)?;
        let label_index = column_index(&headers, &config.target_column, path)?;

        let mut examples = Vec::new();
        for record in reader.records() {
            let record = record?;

            examples.push(Example::new(
                record.get(text_index).unwrap_or_default().to_string(),
                record.get(label_index).unwrap_or_default().to_string(),
            ));
        }

        log::debug!("Loaded {} examples from {}", examples.len(), path.display());

        Ok(Self { examples })
    }

    /// Returns the example at the given index
    pub fn get(&self, index: usize) -> Option<&Example> {
        self.examples.get(index)
    }

    /// Returns the number of examples
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Returns true if the dataset holds no examples
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Returns all examples
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Returns the texts, in order
    pub fn texts(&self) -> Vec<String> {
        self.examples.iter().map(|e| e.text.clone()).collect()
    }

    /// Returns the class labels, in order
    pub fn labels(&self) -> Vec<String> {
        self.examples.iter().map(|e| e.label.clone()).collect()
    }
}

impl FromIterator<Example> for Dataset {
    fn from_iter<T: IntoIterator<Item = Example>>(iter: T) -> Self {
        Self {
            examples: iter.into_iter().collect(),
        }
    }
}

/// The train and held-out test splits of an experiment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    /// The split the pipeline is fitted on
    pub train: Dataset,

    /// The held-out split used for evaluation and diagnostics
    pub test: Dataset,
}

/// Load both splits described by the data config
pub fn load_data(config: &DataConfig) -> Result<Split, DatasetError> {
    let train = Dataset::load(&config.train_data_path, config)?;
    let test = Dataset::load(&config.test_data_path, config)?;

    Ok(Split { train, test })
}

fn delimiter(sep: &str) -> Result<u8, DatasetError> {
    match sep.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(DatasetError::InvalidDelimiter(sep.to_string())),
    }
}

fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    path: &Path,
) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| DatasetError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}
