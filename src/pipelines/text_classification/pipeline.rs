use std::{fs, path::Path};

use burn::tensor::{backend::Backend, Tensor};
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{
    label_encoder::LabelEncoder,
    model::{ClassifierError, LinearClassifier},
    vectorizer::TfidfVectorizer,
};

/// A trait for fitted models that score raw texts against a fixed set of classes
pub trait Classifier {
    /// The class names, indexed by class id
    fn classes(&self) -> &[String];

    /// One probability row per text, with one column per class
    fn predict_proba<B: Backend>(&self, texts: &[String], device: &B::Device) -> Vec<Vec<f32>>;

    /// The probability of the class with id 1 for each text
    fn positive_scores<B: Backend>(&self, texts: &[String], device: &B::Device) -> Vec<f64> {
        self.predict_proba::<B>(texts, device)
            .iter()
            .map(|row| row.get(1).copied().unwrap_or_default() as f64)
            .collect()
    }
}

/// A fitted text classification pipeline: label encoder, TF-IDF vectorizer and classifier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct Pipeline {
    /// Class name to class id mapping
    pub encoder: LabelEncoder,

    /// Text to feature vector transform
    pub vectorizer: TfidfVectorizer,

    /// Feature vector to class probabilities
    pub classifier: LinearClassifier,
}

impl Pipeline {
    /// Class probabilities as a `[n_texts, n_classes]` tensor
    pub fn predict_proba_tensor<B: Backend, S: AsRef<str>>(
        &self,
        texts: &[S],
        device: &B::Device,
    ) -> Tensor<B, 2> {
        self.classifier
            .predict_proba(self.vectorizer.transform::<B, S>(texts, device))
    }

    /// The most probable class id for each text
    pub fn predict<B: Backend, S: AsRef<str>>(&self, texts: &[S], device: &B::Device) -> Vec<usize> {
        if texts.is_empty() {
            return Vec::new();
        }

        self.predict_proba_tensor::<B, S>(texts, device)
            .argmax(1)
            .into_data()
            .convert::<i64>()
            .value
            .into_iter()
            .map(|id| id as usize)
            .collect()
    }

    /// The class names, indexed by class id
    pub fn target_names(&self) -> &[String] {
        self.encoder.classes()
    }

    /// Serialize the pipeline to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Deserialize a pipeline written by [`Pipeline::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let json = fs::read_to_string(path)?;
        let pipeline: Self = serde_json::from_str(&json)?;
        pipeline.validate()?;

        Ok(pipeline)
    }

    /// Check that the fitted parts agree on their dimensions
    pub fn validate(&self) -> Result<(), ArtifactError> {
        self.classifier.validate()?;

        if self.classifier.n_classes() != self.encoder.n_classes() {
            return Err(ArtifactError::Inconsistent(format!(
                "the classifier has {} classes but the label encoder has {}",
                self.classifier.n_classes(),
                self.encoder.n_classes()
            )));
        }

        let n_terms = self.vectorizer.vocabulary().len();
        if n_terms != self.vectorizer.n_features() {
            return Err(ArtifactError::Inconsistent(format!(
                "the vectorizer has {} terms but {} idf weights",
                n_terms,
                self.vectorizer.n_features()
            )));
        }

        if let Some((term, column)) = self
            .vectorizer
            .vocabulary()
            .iter()
            .find(|&(_, &column)| column >= n_terms)
        {
            return Err(ArtifactError::Inconsistent(format!(
                "the term {term:?} maps to column {column} of {n_terms}"
            )));
        }

        if self.classifier.n_features() != self.vectorizer.n_features() {
            return Err(ArtifactError::Inconsistent(format!(
                "the classifier expects {} features but the vectorizer produces {}",
                self.classifier.n_features(),
                self.vectorizer.n_features()
            )));
        }

        Ok(())
    }
}

impl Classifier for Pipeline {
    fn classes(&self) -> &[String] {
        self.target_names()
    }

    fn predict_proba<B: Backend>(&self, texts: &[String], device: &B::Device) -> Vec<Vec<f32>> {
        if texts.is_empty() {
            return Vec::new();
        }

        self.predict_proba_tensor::<B, String>(texts, device)
            .into_data()
            .convert::<f32>()
            .value
            .chunks(self.classifier.n_classes())
            .map(<[f32]>::to_vec)
            .collect()
    }
}

/// Artifact Error
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    /// The artifact could not be read or written
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The artifact is not a valid serialized pipeline
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The classifier weights are malformed
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// The parts of the pipeline disagree with each other
    #[error("inconsistent pipeline: {0}")]
    Inconsistent(String),
}
