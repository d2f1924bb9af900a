use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Precision, recall, F1 and support for a single class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// The class name
    pub label: String,

    /// TP / (TP + FP), or 0 when nothing was predicted as this class
    pub precision: f64,

    /// TP / (TP + FN), or 0 when the class has no samples
    pub recall: f64,

    /// Harmonic mean of precision and recall
    pub f1: f64,

    /// Number of samples whose true class is this one
    pub support: usize,
}

/// Averaged precision, recall and F1
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    /// Averaged precision
    pub precision: f64,

    /// Averaged recall
    pub recall: f64,

    /// Averaged F1
    pub f1: f64,
}

/// A per-class classification report with accuracy and macro/weighted averages
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// One entry per class, in class id order
    pub classes: Vec<ClassMetrics>,

    /// Fraction of samples predicted correctly
    pub accuracy: f64,

    /// Unweighted mean over classes
    pub macro_avg: Averages,

    /// Mean over classes weighted by support
    pub weighted_avg: Averages,

    /// Total number of samples
    pub support: usize,
}

impl Report {
    /// Compare predicted against true class ids
    pub fn new(
        y_true: &[usize],
        y_pred: &[usize],
        target_names: &[String],
    ) -> Result<Self, ReportError> {
        if y_true.len() != y_pred.len() {
            return Err(ReportError::LengthMismatch(y_true.len(), y_pred.len()));
        }

        let n_classes = target_names.len();
        if let Some(&id) = y_true.iter().chain(y_pred).find(|&&id| id >= n_classes) {
            return Err(ReportError::UnknownClass(id, n_classes));
        }

        let classes = target_names
            .iter()
            .enumerate()
            .map(|(class, label)| {
                let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
                for (&actual, &predicted) in y_true.iter().zip(y_pred) {
                    match (actual == class, predicted == class) {
                        (true, true) => tp += 1,
                        (false, true) => fp += 1,
                        (true, false) => fn_ += 1,
                        (false, false) => {}
                    }
                }

                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };

                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support: tp + fn_,
                }
            })
            .collect::<Vec<_>>();

        let correct = y_true.iter().zip(y_pred).filter(|(a, p)| a == p).count();
        let support = y_true.len();

        let macro_avg = average(&classes, |_| 1.0);
        let weighted_avg = average(&classes, |class| class.support as f64);

        Ok(Self {
            classes,
            accuracy: ratio(correct, support),
            macro_avg,
            weighted_avg,
            support,
        })
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn average(classes: &[ClassMetrics], weight: impl Fn(&ClassMetrics) -> f64) -> Averages {
    let total = classes.iter().map(&weight).sum::<f64>();
    if total == 0.0 {
        return Averages {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
        };
    }

    let mean = |metric: fn(&ClassMetrics) -> f64| {
        classes.iter().map(|c| metric(c) * weight(c)).sum::<f64>() / total
    };

    Averages {
        precision: mean(|c| c.precision),
        recall: mean(|c| c.recall),
        f1: mean(|c| c.f1),
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|class| class.label.chars().count())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or_default();

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        for class in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                class.label, class.precision, class.recall, class.f1, class.support
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.support
        )?;

        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.support
            )?;
        }

        Ok(())
    }
}

/// Report Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    /// The true and predicted label sequences differ in length
    #[error("y_true has {0} samples but y_pred has {1}")]
    LengthMismatch(usize, usize),

    /// A class id has no name
    #[error("class id {0} is out of range for {1} target names")]
    UnknownClass(usize, usize),
}
