/// Model directory resolution and validation
pub mod resolver;

/// Curve rendering
pub mod display;

use std::path::Path;

use burn::tensor::backend::Backend;

pub use display::{
    plot_precision_recall_curve, plot_roc_curve, PrecisionRecallDisplay, RocCurveDisplay,
};
pub use resolver::{get_model_and_data, ResolveError, Resolved};

use crate::{
    metrics::{self, PrecisionRecall, Roc},
    pipelines::text_classification::{Classifier, EncoderError},
};

/// Recompute the precision-recall curve of a saved binary classifier on its test split
pub fn get_precision_recall_curve<B: Backend>(
    model_dir: impl AsRef<Path>,
    device: &B::Device,
) -> anyhow::Result<PrecisionRecall> {
    let resolved = get_model_and_data(model_dir)?;

    precision_recall_for::<B, _>(
        &resolved.model,
        &resolved.test_texts,
        &resolved.test_labels,
        device,
    )
}

/// Recompute the ROC curve of a saved binary classifier on its test split
pub fn get_roc_curve<B: Backend>(
    model_dir: impl AsRef<Path>,
    device: &B::Device,
) -> anyhow::Result<Roc> {
    let resolved = get_model_and_data(model_dir)?;

    roc_for::<B, _>(
        &resolved.model,
        &resolved.test_texts,
        &resolved.test_labels,
        device,
    )
}

/// The precision-recall curve of any binary classifier over labeled texts
pub fn precision_recall_for<B: Backend, C: Classifier>(
    classifier: &C,
    texts: &[String],
    labels: &[String],
    device: &B::Device,
) -> anyhow::Result<PrecisionRecall> {
    let (y_true, scores) = score::<B, C>(classifier, texts, labels, device)?;

    Ok(metrics::precision_recall_curve(&y_true, &scores)?)
}

/// The ROC curve of any binary classifier over labeled texts
pub fn roc_for<B: Backend, C: Classifier>(
    classifier: &C,
    texts: &[String],
    labels: &[String],
    device: &B::Device,
) -> anyhow::Result<Roc> {
    let (y_true, scores) = score::<B, C>(classifier, texts, labels, device)?;

    Ok(metrics::roc_curve(&y_true, &scores)?)
}

/// Encode the labels by class position and score the positive class
fn score<B: Backend, C: Classifier>(
    classifier: &C,
    texts: &[String],
    labels: &[String],
    device: &B::Device,
) -> Result<(Vec<usize>, Vec<f64>), EncoderError> {
    let classes = classifier.classes();

    let y_true = labels
        .iter()
        .map(|label| {
            classes
                .iter()
                .position(|class| class == label)
                .ok_or_else(|| EncoderError::UnseenLabel(label.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Scoring {} texts against {:?}", texts.len(), classes);

    Ok((y_true, classifier.positive_scores::<B>(texts, device)))
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::metrics::CurveError;

    /// Scores each text by its length, capped at 1
    struct LengthClassifier {
        classes: Vec<String>,
    }

    impl Classifier for LengthClassifier {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba<B: Backend>(&self, texts: &[String], _device: &B::Device) -> Vec<Vec<f32>> {
            texts
                .iter()
                .map(|text| {
                    let p = (text.len() as f32 / 10.0).min(1.0);
                    vec![1.0 - p, p]
                })
                .collect()
        }
    }

    fn classifier() -> LengthClassifier {
        LengthClassifier {
            classes: vec!["short".to_string(), "long".to_string()],
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_curves_accept_any_classifier() {
        let device = NdArrayDevice::default();
        let texts = strings(&["ab", "abcdefgh", "abcd", "abcdefghij"]);
        let labels = strings(&["short", "long", "short", "long"]);

        let pr = precision_recall_for::<NdArray, _>(&classifier(), &texts, &labels, &device)
            .unwrap();

        assert_eq!(pr.precision.len(), pr.thresholds.len());
        assert!(pr.recall.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(pr.average_precision(), 1.0);

        let roc = roc_for::<NdArray, _>(&classifier(), &texts, &labels, &device).unwrap();

        assert_eq!(roc.auc(), 1.0);
        assert!(roc.fpr.windows(2).all(|w| w[0] <= w[1]));
        assert!(roc.tpr.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_unknown_label() {
        let device = NdArrayDevice::default();
        let err = roc_for::<NdArray, _>(
            &classifier(),
            &strings(&["ab"]),
            &strings(&["medium"]),
            &device,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EncoderError>(),
            Some(EncoderError::UnseenLabel(label)) if label == "medium"
        ));
    }

    #[test]
    fn test_single_class_test_split() {
        let device = NdArrayDevice::default();
        let err = roc_for::<NdArray, _>(
            &classifier(),
            &strings(&["ab", "abc"]),
            &strings(&["short", "short"]),
            &device,
        )
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::NoPositiveSamples)
        );
    }
}
