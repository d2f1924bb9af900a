use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Maps class names to dense integer ids, in sorted class name order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit the encoder on the distinct labels
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes = labels
            .iter()
            .map(|label| label.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self { classes }
    }

    /// Fit the encoder and encode the same labels
    pub fn fit_transform<S: AsRef<str>>(labels: &[S]) -> (Self, Vec<usize>) {
        let encoder = Self::fit(labels);

        let ids = labels
            .iter()
            .map(|label| encoder.id(label.as_ref()).unwrap_or_default())
            .collect();

        (encoder, ids)
    }

    /// Encode labels, failing on any label that was not seen during fitting
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, EncoderError> {
        labels
            .iter()
            .map(|label| {
                self.id(label.as_ref())
                    .ok_or_else(|| EncoderError::UnseenLabel(label.as_ref().to_string()))
            })
            .collect()
    }

    /// Decode class ids back to class names
    pub fn inverse_transform(&self, ids: &[usize]) -> Result<Vec<String>, EncoderError> {
        ids.iter()
            .map(|&id| {
                self.classes
                    .get(id)
                    .cloned()
                    .ok_or(EncoderError::UnknownId(id))
            })
            .collect()
    }

    /// The class names, indexed by class id
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The number of classes
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    fn id(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .ok()
    }
}

/// Label Encoder Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EncoderError {
    /// The label was not present when the encoder was fitted
    #[error("y contains previously unseen label: {0:?}")]
    UnseenLabel(String),

    /// The class id is out of range
    #[error("no class with id {0}")]
    UnknownId(usize),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_classes_are_sorted_and_distinct() {
        let (encoder, ids) = LabelEncoder::fit_transform(&["spam", "ham", "spam", "eggs"]);

        assert_eq!(encoder.classes(), ["eggs", "ham", "spam"]);
        assert_eq!(ids, vec![2, 1, 2, 0]);
    }

    #[test]
    fn test_transform_rejects_unseen_labels() {
        let encoder = LabelEncoder::fit(&["a", "b"]);

        assert_eq!(encoder.transform(&["b", "a"]), Ok(vec![1, 0]));
        assert_eq!(
            encoder.transform(&["a", "c"]),
            Err(EncoderError::UnseenLabel("c".to_string()))
        );
    }

    #[test]
    fn test_inverse_transform() {
        let encoder = LabelEncoder::fit(&["neg", "pos"]);

        assert_eq!(
            encoder.inverse_transform(&[1, 0]),
            Ok(vec!["pos".to_string(), "neg".to_string()])
        );
        assert_eq!(encoder.inverse_transform(&[2]), Err(EncoderError::UnknownId(2)));
    }
}
