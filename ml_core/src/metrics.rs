use std::fmt;

use crate::{Label, MlError, Result};

/// Fraction of predictions that exactly match the true labels.
///
/// # Errors
/// Returns `MlError::ShapeMismatch` if the slices differ in length, or
/// `MlError::EmptyInput` if they are empty.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> Result<f32> {
    check_pair(y_true, y_pred)?;

    let hits = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(hits as f32 / y_true.len() as f32)
}

/// Binary confusion matrix, class `1` being the positive one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Tallies predictions against the true labels.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the slices differ in length,
    /// `MlError::EmptyInput` if they are empty, or `MlError::InvalidLabel` for
    /// labels outside of `{0, 1}`.
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> Result<Self> {
        check_pair(y_true, y_pred)?;

        let mut cm = Self::default();
        for (index, (&t, &p)) in y_true.iter().zip(y_pred).enumerate() {
            match (t, p) {
                (0, 0) => cm.tn += 1,
                (0, 1) => cm.fp += 1,
                (1, 0) => cm.fn_ += 1,
                (1, 1) => cm.tp += 1,
                (0 | 1, label) | (label, _) => return Err(MlError::InvalidLabel { index, label }),
            }
        }

        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// The classes that show up either as truth or as prediction.
    pub fn observed_classes(&self) -> Vec<Label> {
        let negatives = self.tn + self.fp + self.fn_;
        let positives = self.fp + self.fn_ + self.tp;

        [(0, negatives), (1, positives)]
            .into_iter()
            .filter(|&(_, n)| n > 0)
            .map(|(class, _)| class)
            .collect()
    }
}

/// Prints the raw matrix, rows being true classes and columns predicted ones.
///
/// A degenerate matrix prints as its only populated cell.
impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.observed_classes().as_slice() {
            [0] => write!(f, "[[{}]]", self.tn),
            [1] => write!(f, "[[{}]]", self.tp),
            [] => write!(f, "[]"),
            _ => {
                let width = [self.tn, self.fp, self.fn_, self.tp]
                    .iter()
                    .map(|n| n.to_string().len())
                    .max()
                    .unwrap_or(1);
                writeln!(f, "[[{:>width$} {:>width$}]", self.tn, self.fp)?;
                write!(f, " [{:>width$} {:>width$}]]", self.fn_, self.tp)
            }
        }
    }
}

fn check_pair(y_true: &[Label], y_pred: &[Label]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(MlError::ShapeMismatch {
            what: "predictions",
            got: y_pred.len(),
            expected: y_true.len(),
        });
    }
    if y_true.is_empty() {
        return Err(MlError::EmptyInput("label set"));
    }
    Ok(())
}
