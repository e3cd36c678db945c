use std::path::PathBuf;

use ml_core::{FormulationPolicy, LinearSvcParams};

use crate::{error::PipelineError, feed::ThresholdLabeler};

/// Everything a training run depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// The JSON feed document to train on.
    pub feed_path: PathBuf,
    /// CO level (ppm, `field8`) above which a reading counts as a real alarm.
    pub threshold: f32,
    /// Fraction of the samples held out for testing.
    pub test_size: f32,
    /// Seed for both the split and the solver.
    pub seed: u64,
    /// Solver stopping tolerance.
    pub tol: f32,
    /// Solver iteration budget.
    pub max_iter: usize,
    pub formulation: FormulationPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_path: PathBuf::from("feed.json"),
            threshold: 500.0,
            test_size: 0.25,
            seed: 42,
            tol: 1e-4,
            max_iter: 2000,
            formulation: FormulationPolicy::Auto,
        }
    }
}

impl PipelineConfig {
    /// The default labeling rule: `field8 > threshold`.
    pub fn labeler(&self) -> ThresholdLabeler {
        ThresholdLabeler::carbon_monoxide(self.threshold)
    }

    /// Classifier hyperparameters derived from this config.
    pub fn svc_params(&self) -> LinearSvcParams {
        LinearSvcParams::default()
            .with_tolerance(self.tol)
            .with_max_iter(self.max_iter)
            .with_seed(self.seed)
            .with_formulation(self.formulation)
    }

    /// Checks the values that cannot be caught by the types alone.
    ///
    /// # Errors
    /// Returns `PipelineError::InvalidConfig` describing the first invalid field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.threshold.is_finite() {
            return Err(PipelineError::InvalidConfig(
                "threshold must be a finite number".into(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_size ({}) must be in (0, 1)",
                self.test_size
            )));
        }
        if !(self.tol > 0.0 && self.tol.is_finite()) {
            return Err(PipelineError::InvalidConfig(format!(
                "tol ({}) must be a positive number",
                self.tol
            )));
        }
        if self.max_iter == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_iter must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_training_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.feed_path, PathBuf::from("feed.json"));
        assert_eq!(config.threshold, 500.0);
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.seed, 42);
        assert_eq!(config.tol, 1e-4);
        assert_eq!(config.max_iter, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn svc_params_carry_solver_settings() {
        let params = PipelineConfig::default().svc_params();
        assert_eq!(params.c, 1.0);
        assert_eq!(params.tol, 1e-4);
        assert_eq!(params.max_iter, 2000);
        assert_eq!(params.seed, 42);
        assert_eq!(params.formulation, FormulationPolicy::Auto);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            PipelineConfig {
                test_size: 0.0,
                ..Default::default()
            },
            PipelineConfig {
                tol: -1.0,
                ..Default::default()
            },
            PipelineConfig {
                max_iter: 0,
                ..Default::default()
            },
            PipelineConfig {
                threshold: f32::NAN,
                ..Default::default()
            },
        ];

        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(PipelineError::InvalidConfig(_))
            ));
        }
    }
}
