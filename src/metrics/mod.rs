//! Evaluation of binary classifiers: confusion matrix, threshold metrics and
//! ROC analysis.

use std::cmp::Ordering;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Float;


/// Simplified `Result` using [`MetricsError`] as error type
pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("cannot evaluate an empty set of labels")]
    EmptyInput,
    #[error("expected {expected} labels, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("label at index {0} is neither 0 nor 1")]
    NonBinaryLabel(usize),
    #[error("ROC analysis needs both positive and negative samples")]
    SingleClass,
}

fn check_labels(y_true: ArrayView1<usize>, n_other: usize) -> Result<()> {
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput);
    }
    if y_true.len() != n_other {
        return Err(MetricsError::LengthMismatch {
            expected: y_true.len(),
            found: n_other,
        });
    }
    Ok(())
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.
    } else {
        num as f64 / denom as f64
    }
}

/// Counts of a binary classifier's outcomes, class `1` being the positive
/// (malignant) class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BinaryConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl BinaryConfusionMatrix {
    pub fn from_labels(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<Self> {
        check_labels(y_true, y_pred.len())?;
        let mut cm = BinaryConfusionMatrix::default();
        for (idx, (&t, &p)) in y_true.iter().zip(y_pred.iter()).enumerate() {
            match (t, p) {
                (0, 0) => cm.tn += 1,
                (0, 1) => cm.fp += 1,
                (1, 0) => cm.fn_ += 1,
                (1, 1) => cm.tp += 1,
                _ => return Err(MetricsError::NonBinaryLabel(idx)),
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    /// `TP / (TP + FP)`, `0` when nothing is predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// `TP / (TP + FN)`, also known as sensitivity.
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn sensitivity(&self) -> f64 {
        self.recall()
    }

    /// `TN / (TN + FP)`
    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0. {
            0.
        } else {
            2. * p * r / (p + r)
        }
    }
}

pub fn accuracy(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    Ok(BinaryConfusionMatrix::from_labels(y_true, y_pred)?.accuracy())
}

/// A point of the ROC curve: rates obtained when predicting positive every
/// sample scored at least `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint<F> {
    pub threshold: F,
    pub fpr: f64,
    pub tpr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve<F> {
    pub points: Vec<RocPoint<F>>,
    pub auc: f64,
}

/// This function sweeps the decision threshold over every distinct score,
/// from the highest down, and integrates the curve with the trapezoidal
/// rule. The first point is `(0, 0)` at an infinite threshold.
pub fn roc_curve<F: Float>(
    y_true: ArrayView1<usize>,
    scores: ArrayView1<F>,
) -> Result<RocCurve<F>> {
    check_labels(y_true, scores.len())?;
    if let Some(idx) = y_true.iter().position(|&t| t > 1) {
        return Err(MetricsError::NonBinaryLabel(idx));
    }
    let n_pos = y_true.iter().filter(|&&t| t == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricsError::SingleClass);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut points = vec![RocPoint {
        threshold: F::infinity(),
        fpr: 0.,
        tpr: 0.,
    }];
    let (mut tp, mut fp) = (0, 0);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        // ties share a single point
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold,
            fpr: ratio(fp, n_neg),
            tpr: ratio(tp, n_pos),
        });
    }

    let auc = points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.)
        .sum::<f64>();
    Ok(RocCurve { points, auc })
}

pub fn roc_auc<F: Float>(y_true: ArrayView1<usize>, scores: ArrayView1<F>) -> Result<f64> {
    Ok(roc_curve(y_true, scores)?.auc)
}

/// The usual summary of a binary classifier on a labelled set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub confusion_matrix: BinaryConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub f1: f64,
    /// Only available when probabilities are supplied and both classes are
    /// present.
    pub roc_auc: Option<f64>,
}

impl ClassificationReport {
    pub fn evaluate<F: Float>(
        y_true: ArrayView1<usize>,
        y_pred: ArrayView1<usize>,
        proba: Option<ArrayView1<F>>,
    ) -> Result<Self> {
        let cm = BinaryConfusionMatrix::from_labels(y_true, y_pred)?;
        let roc_auc = match proba {
            Some(proba) => match roc_auc(y_true, proba) {
                Ok(auc) => Some(auc),
                Err(MetricsError::SingleClass) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };
        Ok(ClassificationReport {
            confusion_matrix: cm,
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            specificity: cm.specificity(),
            f1: cm.f1(),
            roc_auc,
        })
    }
}
