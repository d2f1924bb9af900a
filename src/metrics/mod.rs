/// Per-class classification report
pub mod report;

/// Precision-recall and ROC curves for binary classifiers
pub mod curves;

pub use curves::{auc, precision_recall_curve, roc_curve, CurveError, PrecisionRecall, Roc};
pub use report::{Averages, ClassMetrics, Report, ReportError};
