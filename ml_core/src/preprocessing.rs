use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{MlError, Result};

/// Standardizes features by removing the mean and scaling to unit variance.
///
/// Statistics are the population mean and standard deviation of each column of
/// the data passed to `fit`. A column without variance (up to rounding) gets a
/// scale of `1.0`, so it is only centered.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f32>,
    scale: Array1<f32>,
}

impl StandardScaler {
    /// Computes the per-feature statistics of `x`.
    ///
    /// # Errors
    /// Returns `MlError::EmptyInput` if `x` has no rows.
    pub fn fit(x: ArrayView2<'_, f32>) -> Result<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or(MlError::EmptyInput("feature matrix"))?;

        let scale = x
            .var_axis(Axis(0), 0.0)
            .mapv(|var| match var.sqrt() {
                std if std < 10.0 * f32::EPSILON => 1.0,
                std => std,
            });

        Ok(Self { mean, scale })
    }

    #[inline]
    pub fn mean(&self) -> ArrayView1<'_, f32> {
        self.mean.view()
    }

    #[inline]
    pub fn scale(&self) -> ArrayView1<'_, f32> {
        self.scale.view()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Applies `(x - mean) / scale` to every row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong amount of columns.
    pub fn transform(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        self.check_width(x.ncols())?;
        Ok((&x - &self.mean) / &self.scale)
    }

    /// Applies `x * scale + mean` to every row of `x`, undoing `transform`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong amount of columns.
    pub fn inverse_transform(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        self.check_width(x.ncols())?;
        Ok(&x * &self.scale + &self.mean)
    }

    fn check_width(&self, got: usize) -> Result<()> {
        if got != self.n_features() {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got,
                expected: self.n_features(),
            });
        }

        Ok(())
    }
}
