use std::collections::{BTreeMap, HashMap, HashSet};

use burn::tensor::{backend::Backend, Data, Shape, Tensor};
use serde::{Deserialize, Serialize};

use crate::config::TfidfConfig;

/// A fitted TF-IDF vectorizer over word n-grams
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    lowercase: bool,
    ngram_range: (usize, usize),
    sublinear_tf: bool,

    /// Term to feature column, columns assigned in alphabetical term order
    vocabulary: BTreeMap<String, usize>,

    /// Smoothed inverse document frequency per feature column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and inverse document frequencies of the documents
    pub fn fit<S: AsRef<str>>(config: &TfidfConfig, documents: &[S]) -> Result<Self, VectorizerError> {
        let mut vectorizer = Self {
            lowercase: config.lowercase,
            ngram_range: config.ngram_range,
            sublinear_tf: config.sublinear_tf,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        };

        let n_docs = documents.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut term_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let mut seen = HashSet::new();

            for term in vectorizer.analyze(document.as_ref()) {
                *term_frequency.entry(term.clone()).or_insert(0) += 1;

                if seen.insert(term.clone()) {
                    *document_frequency.entry(term).or_insert(0) += 1;
                }
            }
        }

        let min_doc_count = config.min_df.to_count(n_docs);
        let max_doc_count = config.max_df.to_count(n_docs);
        if max_doc_count < min_doc_count {
            return Err(VectorizerError::InvalidDocumentFrequency);
        }

        let mut terms = document_frequency
            .iter()
            .filter(|&(_, &df)| df as f64 >= min_doc_count && df as f64 <= max_doc_count)
            .map(|(term, _)| term.clone())
            .collect::<Vec<_>>();

        if let Some(max_features) = config.max_features {
            terms.sort_by(|a, b| {
                term_frequency[b]
                    .cmp(&term_frequency[a])
                    .then_with(|| a.cmp(b))
            });
            terms.truncate(max_features);
        }

        if terms.is_empty() {
            return Err(VectorizerError::EmptyVocabulary);
        }

        terms.sort();

        vectorizer.idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency[term] as f64;
                ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        vectorizer.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term, column))
            .collect();

        log::debug!(
            "Fitted TF-IDF vocabulary of {} terms on {} documents",
            vectorizer.n_features(),
            n_docs
        );

        Ok(vectorizer)
    }

    /// Vectorize documents into a `[n_documents, n_features]` tensor
    pub fn transform<B: Backend, S: AsRef<str>>(
        &self,
        documents: &[S],
        device: &B::Device,
    ) -> Tensor<B, 2> {
        let values = documents
            .iter()
            .flat_map(|document| self.transform_one(document.as_ref()))
            .collect::<Vec<f32>>();

        Tensor::from_floats(
            Data::new(values, Shape::new([documents.len(), self.n_features()])),
            device,
        )
    }

    /// Vectorize a single document into a dense, L2-normalized row
    pub fn transform_one(&self, document: &str) -> Vec<f32> {
        let mut row = vec![0.0f64; self.n_features()];

        for term in self.analyze(document) {
            if let Some(&column) = self.vocabulary.get(&term) {
                row[column] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            if *value > 0.0 {
                if self.sublinear_tf {
                    *value = 1.0 + value.ln();
                }
                *value *= idf;
            }
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }

        row.into_iter().map(|v| v as f32).collect()
    }

    /// The number of feature columns
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Term to feature column mapping
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Inverse document frequencies, indexed by feature column
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Split a document into the terms the vocabulary is built from
    fn analyze(&self, document: &str) -> Vec<String> {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        // Tokens are runs of two or more word characters
        let tokens = text
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .collect::<Vec<_>>();

        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }

        terms
    }
}

/// Vectorizer Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum VectorizerError {
    /// No term survived tokenization and document frequency filtering
    #[error("empty vocabulary; perhaps the documents only contain stop words")]
    EmptyVocabulary,

    /// The document frequency bounds exclude every term
    #[error("max_df corresponds to < documents than min_df")]
    InvalidDocumentFrequency,
}
