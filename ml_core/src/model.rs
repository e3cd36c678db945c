use ndarray::{Array1, ArrayView2};

use crate::{FitStats, Label, Result};

/// A binary classifier over dense feature rows.
///
/// A `Classifier` defines how to fit itself to labelled samples and how to score
/// new ones. It does not:
/// - scale or otherwise transform its inputs,
/// - decide how labels are produced,
/// - evaluate its own accuracy.
pub trait Classifier {
    /// Fits the classifier to `x` (one sample per row) and `y`.
    ///
    /// # Errors
    /// Returns `MlError` if the inputs violate the classifier's invariants
    /// (e.g. shape mismatch, a single class, non-finite features).
    fn fit(&mut self, x: ArrayView2<'_, f32>, y: &[Label]) -> Result<FitStats>;

    /// Computes the signed distance of each row of `x` to the decision boundary.
    ///
    /// # Errors
    /// Returns `MlError::NotFitted` before `fit`, or `MlError::ShapeMismatch`
    /// if `x` has the wrong amount of columns.
    fn decision_function(&self, x: ArrayView2<'_, f32>) -> Result<Array1<f32>>;

    /// Predicts a label for each row of `x`; non-negative scores map to class `1`.
    ///
    /// # Errors
    /// Same as `decision_function`.
    fn predict(&self, x: ArrayView2<'_, f32>) -> Result<Vec<Label>> {
        let scores = self.decision_function(x)?;
        Ok(scores.iter().map(|&s| Label::from(s >= 0.0)).collect())
    }
}
