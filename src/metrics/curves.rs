use serde::{Deserialize, Serialize};

/// Precision-recall curve coordinates, ordered by increasing threshold
///
/// The last point is `(precision = 1, recall = 0)` at an infinite threshold, so all three
/// sequences have the same length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecall {
    /// TP / (TP + FP) at each threshold
    pub precision: Vec<f64>,

    /// TP / P at each threshold
    pub recall: Vec<f64>,

    /// Scores at or above which a sample is predicted positive
    pub thresholds: Vec<f64>,
}

impl PrecisionRecall {
    /// Step-wise area under the curve: `Σ (R[n] - R[n+1]) * P[n]`
    pub fn average_precision(&self) -> f64 {
        self.recall
            .windows(2)
            .zip(&self.precision)
            .map(|(recall, precision)| (recall[0] - recall[1]) * precision)
            .sum()
    }
}

/// Receiver operating characteristic coordinates, ordered by decreasing threshold
///
/// The first point is `(0, 0)` at an infinite threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roc {
    /// FP / N at each threshold
    pub fpr: Vec<f64>,

    /// TP / P at each threshold
    pub tpr: Vec<f64>,

    /// Scores at or above which a sample is predicted positive
    pub thresholds: Vec<f64>,
}

impl Roc {
    /// Area under the ROC curve
    pub fn auc(&self) -> f64 {
        auc(&self.fpr, &self.tpr)
    }
}

/// Compute the precision-recall curve for binary class ids (1 is the positive class)
pub fn precision_recall_curve(y_true: &[usize], scores: &[f64]) -> Result<PrecisionRecall, CurveError> {
    let counts = binary_clf_curve(y_true, scores)?;

    let positives = counts.tps.last().copied().unwrap_or_default();
    if positives == 0.0 {
        return Err(CurveError::NoPositiveSamples);
    }

    let mut precision = counts
        .tps
        .iter()
        .zip(&counts.fps)
        .map(|(tp, fp)| tp / (tp + fp))
        .collect::<Vec<_>>();
    let mut recall = counts.tps.iter().map(|tp| tp / positives).collect::<Vec<_>>();
    let mut thresholds = counts.thresholds;

    precision.reverse();
    recall.reverse();
    thresholds.reverse();

    precision.push(1.0);
    recall.push(0.0);
    thresholds.push(f64::INFINITY);

    Ok(PrecisionRecall {
        precision,
        recall,
        thresholds,
    })
}

/// Compute the ROC curve for binary class ids (1 is the positive class)
pub fn roc_curve(y_true: &[usize], scores: &[f64]) -> Result<Roc, CurveError> {
    let counts = binary_clf_curve(y_true, scores)?;

    let positives = counts.tps.last().copied().unwrap_or_default();
    let negatives = counts.fps.last().copied().unwrap_or_default();
    if positives == 0.0 {
        return Err(CurveError::NoPositiveSamples);
    }
    if negatives == 0.0 {
        return Err(CurveError::NoNegativeSamples);
    }

    let counts = drop_collinear(counts);

    let fpr = std::iter::once(0.0)
        .chain(counts.fps.iter().map(|fp| fp / negatives))
        .collect();
    let tpr = std::iter::once(0.0)
        .chain(counts.tps.iter().map(|tp| tp / positives))
        .collect();
    let thresholds = std::iter::once(f64::INFINITY)
        .chain(counts.thresholds)
        .collect();

    Ok(Roc {
        fpr,
        tpr,
        thresholds,
    })
}

/// Drop interior points lying on a straight line between their neighbours
///
/// Such points can never be optimal, and removing them leaves the curve and its area unchanged.
fn drop_collinear(counts: ThresholdCounts) -> ThresholdCounts {
    let n = counts.thresholds.len();
    let bends = |values: &[f64], i: usize| values[i - 1] - 2.0 * values[i] + values[i + 1] != 0.0;

    let keep = (0..n)
        .filter(|&i| i == 0 || i + 1 == n || bends(&counts.fps, i) || bends(&counts.tps, i))
        .collect::<Vec<_>>();

    ThresholdCounts {
        fps: keep.iter().map(|&i| counts.fps[i]).collect(),
        tps: keep.iter().map(|&i| counts.tps[i]).collect(),
        thresholds: keep.iter().map(|&i| counts.thresholds[i]).collect(),
    }
}

/// Trapezoidal area under the curve through the points `(x[i], y[i])`
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(x, y)| (x[1] - x[0]).abs() * (y[0] + y[1]) / 2.0)
        .sum()
}

/// Cumulative true and false positive counts at each distinct score, highest score first
struct ThresholdCounts {
    fps: Vec<f64>,
    tps: Vec<f64>,
    thresholds: Vec<f64>,
}

fn binary_clf_curve(y_true: &[usize], scores: &[f64]) -> Result<ThresholdCounts, CurveError> {
    if y_true.is_empty() {
        return Err(CurveError::Empty);
    }
    if y_true.len() != scores.len() {
        return Err(CurveError::LengthMismatch(y_true.len(), scores.len()));
    }
    if let Some(&label) = y_true.iter().find(|&&label| label > 1) {
        return Err(CurveError::NonBinaryLabel(label));
    }
    if let Some(&score) = scores.iter().find(|score| !score.is_finite()) {
        return Err(CurveError::NonFiniteScore(score));
    }

    let mut order = (0..scores.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut counts = ThresholdCounts {
        fps: Vec::new(),
        tps: Vec::new(),
        thresholds: Vec::new(),
    };

    let (mut tp, mut fp) = (0.0, 0.0);
    for (position, &index) in order.iter().enumerate() {
        if y_true[index] == 1 {
            tp += 1.0;
        } else {
            fp += 1.0;
        }

        // Ties share one threshold, emitted after the last sample of the run
        let next = order.get(position + 1).map(|&next| scores[next]);
        if next != Some(scores[index]) {
            counts.tps.push(tp);
            counts.fps.push(fp);
            counts.thresholds.push(scores[index]);
        }
    }

    Ok(counts)
}

/// Curve Error
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CurveError {
    /// There are no samples
    #[error("no samples to compute a curve from")]
    Empty,

    /// The labels and scores differ in length
    #[error("y_true has {0} samples but the scores have {1}")]
    LengthMismatch(usize, usize),

    /// A label is not 0 or 1
    #[error("expected binary class ids 0 or 1, found {0}")]
    NonBinaryLabel(usize),

    /// A score is NaN or infinite
    #[error("scores must be finite, found {0}")]
    NonFiniteScore(f64),

    /// Recall is undefined without positive samples
    #[error("no positive samples in y_true")]
    NoPositiveSamples,

    /// The false positive rate is undefined without negative samples
    #[error("no negative samples in y_true")]
    NoNegativeSamples,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const Y_TRUE: [usize; 4] = [0, 0, 1, 1];
    const SCORES: [f64; 4] = [0.1, 0.4, 0.35, 0.8];

    fn assert_all_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a - e).abs() < 1e-9 || a == e,
                "{actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn test_precision_recall_curve() {
        let curve = precision_recall_curve(&Y_TRUE, &SCORES).unwrap();

        assert_all_close(&curve.precision, &[0.5, 2.0 / 3.0, 0.5, 1.0, 1.0]);
        assert_all_close(&curve.recall, &[1.0, 1.0, 0.5, 0.5, 0.0]);
        assert_all_close(&curve.thresholds, &[0.1, 0.35, 0.4, 0.8, f64::INFINITY]);
    }

    #[test]
    fn test_roc_curve() {
        let curve = roc_curve(&Y_TRUE, &SCORES).unwrap();

        assert_all_close(&curve.fpr, &[0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_all_close(&curve.tpr, &[0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_all_close(&curve.thresholds, &[f64::INFINITY, 0.8, 0.4, 0.35, 0.1]);
        assert!((curve.auc() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_average_precision() {
        let curve = precision_recall_curve(&Y_TRUE, &SCORES).unwrap();

        // 0.5 * 1.0 + 0.5 * 2/3
        assert!((curve.average_precision() - (0.5 + 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_ties_share_a_threshold() {
        let curve = roc_curve(&[0, 1, 1, 0], &[0.5, 0.5, 0.9, 0.1]).unwrap();

        assert_all_close(&curve.thresholds, &[f64::INFINITY, 0.9, 0.5, 0.1]);
        assert_all_close(&curve.fpr, &[0.0, 0.0, 0.5, 1.0]);
        assert_all_close(&curve.tpr, &[0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_roc_drops_collinear_points() {
        let curve = roc_curve(&[0, 0, 1, 1], &[0.1, 0.2, 0.3, 0.4]).unwrap();

        assert_all_close(&curve.fpr, &[0.0, 0.0, 0.0, 1.0]);
        assert_all_close(&curve.tpr, &[0.0, 0.5, 1.0, 1.0]);
        assert_all_close(&curve.thresholds, &[f64::INFINITY, 0.4, 0.3, 0.1]);
        assert_eq!(curve.auc(), 1.0);
    }

    #[test]
    fn test_monotonicity() {
        let y_true = [1, 0, 1, 1, 0, 0, 1, 0, 1, 0];
        let scores = [0.9, 0.8, 0.7, 0.6, 0.55, 0.5, 0.4, 0.3, 0.2, 0.1];

        let pr = precision_recall_curve(&y_true, &scores).unwrap();
        assert_eq!(pr.precision.len(), pr.thresholds.len());
        assert!(pr.thresholds.windows(2).all(|t| t[0] < t[1]));
        assert!(pr.recall.windows(2).all(|r| r[0] >= r[1]));

        let roc = roc_curve(&y_true, &scores).unwrap();
        assert_eq!(roc.fpr.len(), roc.thresholds.len());
        assert!(roc.thresholds.windows(2).all(|t| t[0] > t[1]));
        assert!(roc.fpr.windows(2).all(|r| r[0] <= r[1]));
        assert!(roc.tpr.windows(2).all(|r| r[0] <= r[1]));
    }

    #[test]
    fn test_errors() {
        assert_eq!(precision_recall_curve(&[], &[]), Err(CurveError::Empty));
        assert_eq!(
            roc_curve(&[0, 1], &[0.5]),
            Err(CurveError::LengthMismatch(2, 1))
        );
        assert_eq!(
            roc_curve(&[0, 2], &[0.5, 0.1]),
            Err(CurveError::NonBinaryLabel(2))
        );
        assert_eq!(
            precision_recall_curve(&[0, 0], &[0.5, 0.1]),
            Err(CurveError::NoPositiveSamples)
        );
        assert_eq!(
            roc_curve(&[1, 1], &[0.5, 0.1]),
            Err(CurveError::NoNegativeSamples)
        );
        assert!(matches!(
            roc_curve(&[0, 1], &[f64::NAN, 0.1]),
            Err(CurveError::NonFiniteScore(_))
        ));
    }

    #[test]
    fn test_auc_of_diagonal() {
        assert!((auc(&[0.0, 1.0], &[0.0, 1.0]) - 0.5).abs() < 1e-12);
    }
}
