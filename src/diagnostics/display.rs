use std::{
    fmt::{self, Display},
    io,
};

use derive_new::new;

use crate::metrics::{PrecisionRecall, Roc};

const WIDTH: usize = 50;
const HEIGHT: usize = 20;
const STEPS: usize = 64;

/// A renderable precision-recall curve
#[derive(Clone, Debug, PartialEq, new)]
pub struct PrecisionRecallDisplay {
    /// Precision for different thresholds
    pub precision: Vec<f64>,

    /// Recall for different thresholds
    pub recall: Vec<f64>,

    /// Average precision, shown in the chart title when present
    #[new(default)]
    pub average_precision: Option<f64>,

    /// Decision thresholds, exported as a third CSV column when present
    #[new(default)]
    pub thresholds: Vec<f64>,
}

impl PrecisionRecallDisplay {
    /// Attach the average precision
    pub fn with_average_precision(mut self, average_precision: f64) -> Self {
        self.average_precision = Some(average_precision);
        self
    }

    /// Attach the decision threshold of each point
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Write the `(recall, precision[, threshold])` points as CSV
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        write_points(
            writer,
            ["recall", "precision"],
            &self.recall,
            &self.precision,
            &self.thresholds,
        )
    }
}

impl From<&PrecisionRecall> for PrecisionRecallDisplay {
    fn from(curve: &PrecisionRecall) -> Self {
        Self::new(curve.precision.clone(), curve.recall.clone())
            .with_average_precision(curve.average_precision())
            .with_thresholds(curve.thresholds.clone())
    }
}

impl Display for PrecisionRecallDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.average_precision {
            Some(ap) => format!("Precision-Recall curve (AP = {ap:.2})"),
            None => "Precision-Recall curve".to_string(),
        };

        render_chart(f, &title, "Recall", "Precision", &self.recall, &self.precision)
    }
}

/// A renderable ROC curve
#[derive(Clone, Debug, PartialEq, new)]
pub struct RocCurveDisplay {
    /// False positive rates for different thresholds
    pub fpr: Vec<f64>,

    /// True positive rates for different thresholds
    pub tpr: Vec<f64>,

    /// Area under the curve, shown in the chart title when present
    #[new(default)]
    pub roc_auc: Option<f64>,

    /// Decision thresholds, exported as a third CSV column when present
    #[new(default)]
    pub thresholds: Vec<f64>,
}

impl RocCurveDisplay {
    /// Attach the area under the curve
    pub fn with_roc_auc(mut self, roc_auc: f64) -> Self {
        self.roc_auc = Some(roc_auc);
        self
    }

    /// Attach the decision threshold of each point
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Write the `(fpr, tpr[, threshold])` points as CSV
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        write_points(writer, ["fpr", "tpr"], &self.fpr, &self.tpr, &self.thresholds)
    }
}

impl From<&Roc> for RocCurveDisplay {
    fn from(curve: &Roc) -> Self {
        Self::new(curve.fpr.clone(), curve.tpr.clone())
            .with_roc_auc(curve.auc())
            .with_thresholds(curve.thresholds.clone())
    }
}

impl Display for RocCurveDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.roc_auc {
            Some(auc) => format!("ROC curve (AUC = {auc:.2})"),
            None => "ROC curve".to_string(),
        };

        render_chart(
            f,
            &title,
            "False Positive Rate",
            "True Positive Rate",
            &self.fpr,
            &self.tpr,
        )
    }
}

/// Plot a precision-recall curve
pub fn plot_precision_recall_curve(precision: &[f64], recall: &[f64]) -> PrecisionRecallDisplay {
    PrecisionRecallDisplay::new(precision.to_vec(), recall.to_vec())
}

/// Plot a ROC curve
pub fn plot_roc_curve(fpr: &[f64], tpr: &[f64]) -> RocCurveDisplay {
    RocCurveDisplay::new(fpr.to_vec(), tpr.to_vec())
}

fn write_points<W: io::Write>(
    writer: W,
    headers: [&str; 2],
    x: &[f64],
    y: &[f64],
    thresholds: &[f64],
) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    if thresholds.is_empty() {
        writer.write_record(headers)?;
        for point in x.iter().zip(y) {
            writer.serialize(point)?;
        }
    } else {
        writer.write_record([headers[0], headers[1], "threshold"])?;
        for ((x, y), threshold) in x.iter().zip(y).zip(thresholds) {
            writer.serialize((x, y, threshold))?;
        }
    }
    writer.flush()?;

    Ok(())
}

/// Draw the line through the points on a unit square
fn render_chart(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    x_label: &str,
    y_label: &str,
    x: &[f64],
    y: &[f64],
) -> fmt::Result {
    let mut grid = vec![vec![' '; WIDTH]; HEIGHT];

    let mut plot = |x: f64, y: f64| {
        let column = (x.clamp(0.0, 1.0) * (WIDTH - 1) as f64).round() as usize;
        let row = HEIGHT - 1 - (y.clamp(0.0, 1.0) * (HEIGHT - 1) as f64).round() as usize;
        grid[row][column] = '*';
    };

    for (xs, ys) in x.windows(2).zip(y.windows(2)) {
        for step in 0..=STEPS {
            let t = step as f64 / STEPS as f64;
            plot(xs[0] + t * (xs[1] - xs[0]), ys[0] + t * (ys[1] - ys[0]));
        }
    }
    if let ([x], [y]) = (x, y) {
        plot(*x, *y);
    }

    writeln!(f, "{title}")?;
    writeln!(f, "{y_label}")?;

    for (index, row) in grid.iter().enumerate() {
        let tick = match index {
            0 => "1.0",
            i if i == HEIGHT - 1 => "0.0",
            _ => "",
        };

        writeln!(f, "{tick:>4} |{}", row.iter().collect::<String>())?;
    }

    writeln!(f, "     +{}", "-".repeat(WIDTH))?;
    writeln!(f, "     0.0{:^width$}1.0", x_label, width = WIDTH - 5)
}
