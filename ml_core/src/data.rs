use ndarray::{Array2, ArrayView2, Axis};

use crate::{MlError, Result};

/// A binary class label, `0` or `1`.
pub type Label = u8;

/// An in-memory supervised dataset: one feature row per label.
///
/// Rows keep the order they were inserted in. The dataset does not define
/// how labels were produced or how the features are going to be scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Array2<f32>,
    labels: Vec<Label>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `records` - The feature matrix, one sample per row.
    /// * `labels` - One label per row of `records`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the amount of labels and rows differ.
    pub fn new(records: Array2<f32>, labels: Vec<Label>) -> Result<Self> {
        if records.nrows() != labels.len() {
            return Err(MlError::ShapeMismatch {
                what: "labels",
                got: labels.len(),
                expected: records.nrows(),
            });
        }

        Ok(Self { records, labels })
    }

    /// Builds a dataset out of fixed size rows.
    ///
    /// # Arguments
    /// * `rows` - The feature rows, all of them `N` wide.
    /// * `labels` - One label per row.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the amount of labels and rows differ.
    pub fn from_rows<const N: usize>(rows: &[[f32; N]], labels: Vec<Label>) -> Result<Self> {
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let records = Array2::from_shape_vec((rows.len(), N), flat)
            .map_err(|_| MlError::InvalidInput("rows do not form a matrix"))?;

        Self::new(records, labels)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.records.ncols()
    }

    #[inline]
    pub fn records(&self) -> ArrayView2<'_, f32> {
        self.records.view()
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Builds a new dataset out of the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            records: self.records.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Counts how many samples belong to each binary class.
    ///
    /// # Returns
    /// `[count of class 0, count of class 1]`, labels above 1 are not counted.
    pub fn class_counts(&self) -> [usize; 2] {
        class_counts(&self.labels)
    }

    /// Returns the distinct labels present, in ascending order.
    pub fn classes(&self) -> Vec<Label> {
        let mut classes = self.labels.clone();
        classes.sort_unstable();
        classes.dedup();
        classes
    }
}

/// Counts the samples of each binary class in `labels`.
pub fn class_counts(labels: &[Label]) -> [usize; 2] {
    labels.iter().fold([0, 0], |mut counts, &label| {
        if let Some(count) = counts.get_mut(label as usize) {
            *count += 1;
        }
        counts
    })
}
