//! Linear support vector classification.
//!
//! [`LinearSvc`] minimizes the L2-regularized squared hinge loss
//!
//! ```text
//! min_w  0.5 * ||w||^2 + C * sum_i max(0, 1 - y_i * w.x_i)^2
//! ```
//!
//! where every sample is augmented with a constant `intercept_scaling` feature,
//! so the bias is learned (and regularized) as one more weight. The problem is
//! solved either in its dual or in its primal form by coordinate descent; both
//! reach the same optimum, the choice only affects speed.

mod dual;
mod primal;

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, concatenate};
use rand::{SeedableRng, rngs::StdRng};

use crate::{Classifier, FitStats, Label, MlError, Result, data::class_counts};

/// The optimization problem a solver works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    Dual,
    Primal,
}

impl Formulation {
    /// Picks the formulation that is usually faster for the given shape: the dual
    /// one when there are more samples than features, the primal one otherwise.
    pub fn for_shape(n_samples: usize, n_features: usize) -> Self {
        if n_samples > n_features {
            Formulation::Dual
        } else {
            Formulation::Primal
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formulation::Dual => write!(f, "dual"),
            Formulation::Primal => write!(f, "primal"),
        }
    }
}

/// How `LinearSvc` chooses its formulation when fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormulationPolicy {
    /// Decide from the training data shape, see [`Formulation::for_shape`].
    #[default]
    Auto,
    /// Always use the given formulation.
    Fixed(Formulation),
}

impl FormulationPolicy {
    pub fn resolve(self, n_samples: usize, n_features: usize) -> Formulation {
        match self {
            FormulationPolicy::Auto => Formulation::for_shape(n_samples, n_features),
            FormulationPolicy::Fixed(formulation) => formulation,
        }
    }
}

/// Hyperparameters of a [`LinearSvc`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSvcParams {
    /// Penalty of the loss term, larger means less regularization.
    pub c: f32,
    /// Stopping tolerance of the solver.
    pub tol: f32,
    /// Maximum number of passes over the samples (dual) or features (primal).
    pub max_iter: usize,
    /// Seed for the visiting order of coordinates.
    pub seed: u64,
    /// Value of the constant feature the intercept is learned from.
    pub intercept_scaling: f32,
    pub formulation: FormulationPolicy,
}

impl Default for LinearSvcParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-4,
            max_iter: 1000,
            seed: 0,
            intercept_scaling: 1.0,
            formulation: FormulationPolicy::Auto,
        }
    }
}

impl LinearSvcParams {
    #[must_use]
    pub fn with_c(mut self, c: f32) -> Self {
        self.c = c;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_formulation(mut self, formulation: FormulationPolicy) -> Self {
        self.formulation = formulation;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(MlError::InvalidInput("c must be a positive number"));
        }
        if !(self.tol > 0.0 && self.tol.is_finite()) {
            return Err(MlError::InvalidInput("tol must be a positive number"));
        }
        if self.max_iter == 0 {
            return Err(MlError::InvalidInput("max_iter must be greater than 0"));
        }
        if !self.intercept_scaling.is_finite() {
            return Err(MlError::InvalidInput("intercept_scaling must be finite"));
        }
        Ok(())
    }
}

/// The weights learned by a fitted [`LinearSvc`].
#[derive(Debug, Clone, PartialEq)]
struct Fitted {
    coef: Array1<f32>,
    intercept: f32,
    formulation: Formulation,
}

/// Binary linear support vector classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSvc {
    params: LinearSvcParams,
    fitted: Option<Fitted>,
}

impl Default for LinearSvc {
    fn default() -> Self {
        Self::new(LinearSvcParams::default())
    }
}

impl LinearSvc {
    pub fn new(params: LinearSvcParams) -> Self {
        Self {
            params,
            fitted: None,
        }
    }

    /// The weight of each feature, `None` before fitting.
    pub fn coef(&self) -> Option<ArrayView1<'_, f32>> {
        self.fitted.as_ref().map(|f| f.coef.view())
    }

    /// The bias term, `None` before fitting.
    pub fn intercept(&self) -> Option<f32> {
        self.fitted.as_ref().map(|f| f.intercept)
    }

    /// The formulation used by the last successful `fit`.
    pub fn formulation(&self) -> Option<Formulation> {
        self.fitted.as_ref().map(|f| f.formulation)
    }

    fn validate_inputs(&self, x: ArrayView2<'_, f32>, y: &[Label]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(MlError::ShapeMismatch {
                what: "labels",
                got: y.len(),
                expected: x.nrows(),
            });
        }
        if x.nrows() == 0 {
            return Err(MlError::EmptyInput("training set"));
        }
        if x.ncols() == 0 {
            return Err(MlError::InvalidInput("samples must have at least one feature"));
        }
        if let Some((index, &label)) = y.iter().enumerate().find(|&(_, &l)| l > 1) {
            return Err(MlError::InvalidLabel { index, label });
        }
        if let Some(((row, col), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(MlError::NonFinite { row, col });
        }

        match class_counts(y) {
            [0, _] => Err(MlError::SingleClass { class: 1 }),
            [_, 0] => Err(MlError::SingleClass { class: 0 }),
            _ => Ok(()),
        }
    }

    fn augment(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        let bias = Array2::from_elem((x.nrows(), 1), self.params.intercept_scaling);
        concatenate(Axis(1), &[x, bias.view()])
            .map_err(|_| MlError::InvalidInput("cannot append the intercept column"))
    }
}

impl Classifier for LinearSvc {
    fn fit(&mut self, x: ArrayView2<'_, f32>, y: &[Label]) -> Result<FitStats> {
        self.params.validate()?;
        self.validate_inputs(x, y)?;

        let (n_samples, n_features) = x.dim();
        let formulation = self.params.formulation.resolve(n_samples, n_features);
        log::info!("fitting linear svc: formulation={formulation} n_samples={n_samples} n_features={n_features}");

        let xa = self.augment(x)?;
        let ys: Array1<f32> = y.iter().map(|&l| if l == 1 { 1.0 } else { -1.0 }).collect();
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        let LinearSvcParams {
            c, tol, max_iter, ..
        } = self.params;

        let (w, stats) = match formulation {
            Formulation::Dual => dual::solve(xa.view(), ys.view(), c, tol, max_iter, &mut rng),
            Formulation::Primal => primal::solve(xa.view(), ys.view(), c, tol, max_iter, &mut rng),
        };

        if stats.converged() {
            log::debug!("{formulation} solver converged after {} iterations", stats.iterations());
        } else {
            log::warn!(
                "{formulation} solver did not converge within {max_iter} iterations, \
                 the weights may be inaccurate"
            );
        }

        let coef = w.slice(ndarray::s![..n_features]).to_owned();
        let intercept = w[n_features] * self.params.intercept_scaling;
        self.fitted = Some(Fitted {
            coef,
            intercept,
            formulation,
        });

        Ok(stats)
    }

    fn decision_function(&self, x: ArrayView2<'_, f32>) -> Result<Array1<f32>> {
        let fitted = self.fitted.as_ref().ok_or(MlError::NotFitted("linear svc"))?;

        if x.ncols() != fitted.coef.len() {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected: fitted.coef.len(),
            });
        }

        Ok(x.dot(&fitted.coef) + fitted.intercept)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    /// Two well separated clouds: class 1 around (2, 2), class 0 around (-2, -2).
    fn blobs() -> (Array2<f32>, Vec<Label>) {
        let offsets = [(0.0, 0.0), (0.5, -0.3), (-0.4, 0.2), (0.3, 0.6), (-0.6, -0.5)];
        let mut flat = Vec::new();
        let mut labels = Vec::new();

        for (center, label) in [(2.0_f32, 1), (-2.0, 0)] {
            for (dx, dy) in offsets {
                flat.extend([center + dx, center + dy]);
                labels.push(label);
            }
        }

        (Array2::from_shape_vec((10, 2), flat).unwrap(), labels)
    }

    fn fit_with(formulation: Formulation) -> (LinearSvc, FitStats) {
        let (x, y) = blobs();
        let params = LinearSvcParams::default()
            .with_seed(42)
            .with_max_iter(5000)
            .with_formulation(FormulationPolicy::Fixed(formulation));
        let mut svc = LinearSvc::new(params);
        let stats = svc.fit(x.view(), &y).unwrap();
        (svc, stats)
    }

    #[test]
    fn formulation_follows_shape() {
        assert_eq!(Formulation::for_shape(10, 8), Formulation::Dual);
        assert_eq!(Formulation::for_shape(8, 8), Formulation::Primal);
        assert_eq!(Formulation::for_shape(3, 8), Formulation::Primal);
        assert_eq!(
            FormulationPolicy::Fixed(Formulation::Primal).resolve(100, 2),
            Formulation::Primal
        );
    }

    #[test]
    fn dual_separates_blobs() {
        let (svc, stats) = fit_with(Formulation::Dual);
        let (x, y) = blobs();

        assert!(stats.converged());
        assert_eq!(svc.formulation(), Some(Formulation::Dual));
        assert_eq!(svc.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn primal_separates_blobs() {
        let (svc, stats) = fit_with(Formulation::Primal);
        let (x, y) = blobs();

        assert!(stats.converged());
        assert_eq!(svc.formulation(), Some(Formulation::Primal));
        assert_eq!(svc.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn both_formulations_reach_the_same_boundary() {
        let (dual, _) = fit_with(Formulation::Dual);
        let (primal, _) = fit_with(Formulation::Primal);

        let wd = dual.coef().unwrap();
        let wp = primal.coef().unwrap();
        for (a, b) in wd.iter().zip(wp.iter()) {
            assert!((a - b).abs() < 0.05, "dual={wd} primal={wp}");
        }
        assert!((dual.intercept().unwrap() - primal.intercept().unwrap()).abs() < 0.05);
    }

    #[test]
    fn fit_is_deterministic() {
        let (a, _) = fit_with(Formulation::Dual);
        let (b, _) = fit_with(Formulation::Dual);
        assert_eq!(a, b);
    }

    #[test]
    fn decision_function_is_affine() {
        let (svc, _) = fit_with(Formulation::Dual);
        let w = svc.coef().unwrap().to_owned();
        let b = svc.intercept().unwrap();

        let x = array![[1.0_f32, -3.0]];
        let expected = w[0] * 1.0 + w[1] * -3.0 + b;
        let got = svc.decision_function(x.view()).unwrap()[0];
        assert!((got - expected).abs() < 1e-5);
    }

    #[test]
    fn fit_rejects_single_class() {
        let x = array![[1.0_f32], [2.0], [3.0]];
        let mut svc = LinearSvc::default();
        assert_eq!(
            svc.fit(x.view(), &[1, 1, 1]).unwrap_err(),
            MlError::SingleClass { class: 1 }
        );
        assert!(svc.coef().is_none());
    }

    #[test]
    fn fit_rejects_non_finite_features() {
        let x = array![[1.0_f32, 0.0], [f32::NAN, 1.0]];
        let mut svc = LinearSvc::default();
        assert_eq!(
            svc.fit(x.view(), &[0, 1]).unwrap_err(),
            MlError::NonFinite { row: 1, col: 0 }
        );
    }

    #[test]
    fn fit_rejects_non_binary_labels() {
        let x = array![[1.0_f32], [2.0]];
        let mut svc = LinearSvc::default();
        assert_eq!(
            svc.fit(x.view(), &[0, 2]).unwrap_err(),
            MlError::InvalidLabel { index: 1, label: 2 }
        );
    }

    #[test]
    fn fit_rejects_mismatched_labels() {
        let x = array![[1.0_f32], [2.0]];
        let mut svc = LinearSvc::default();
        assert!(matches!(
            svc.fit(x.view(), &[0]),
            Err(MlError::ShapeMismatch { what: "labels", .. })
        ));
    }

    #[test]
    fn predict_before_fit_fails() {
        let svc = LinearSvc::default();
        let x = array![[1.0_f32]];
        assert_eq!(
            svc.predict(x.view()).unwrap_err(),
            MlError::NotFitted("linear svc")
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let x = array![[1.0_f32], [2.0]];
        let mut svc = LinearSvc::new(LinearSvcParams::default().with_c(0.0));
        assert!(matches!(
            svc.fit(x.view(), &[0, 1]),
            Err(MlError::InvalidInput(_))
        ));
    }
}
