use std::fmt;

use ml_core::{FitStats, Formulation, Label, MlError, metrics::ConfusionMatrix};

use crate::feed::{FALSE_ALARM, N_FIELDS, NON_FALSE_ALARM};

/// The constants a microcontroller needs to classify raw readings.
///
/// Classification is `sum_i ((raw_i - mean_i) / scale_i) * weight_i + bias`,
/// non-negative values being real alarms.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedModel {
    pub means: [f32; N_FIELDS],
    pub scales: [f32; N_FIELDS],
    pub weights: [f32; N_FIELDS],
    pub bias: f32,
}

impl EmbeddedModel {
    /// Bundles the scaler statistics and the classifier weights.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if any slice is not `N_FIELDS` long.
    pub fn new(means: &[f32], scales: &[f32], weights: &[f32], bias: f32) -> Result<Self, MlError> {
        Ok(Self {
            means: fixed("means", means)?,
            scales: fixed("scales", scales)?,
            weights: fixed("weights", weights)?,
            bias,
        })
    }

    /// Signed score of a raw, unscaled reading.
    pub fn decision(&self, raw: &[f32; N_FIELDS]) -> f32 {
        raw.iter()
            .zip(&self.means)
            .zip(&self.scales)
            .zip(&self.weights)
            .map(|(((x, mean), scale), w)| (x - mean) / scale * w)
            .sum::<f32>()
            + self.bias
    }

    pub fn classify(&self, raw: &[f32; N_FIELDS]) -> Label {
        if self.decision(raw) >= 0.0 {
            NON_FALSE_ALARM
        } else {
            FALSE_ALARM
        }
    }
}

fn fixed(what: &'static str, values: &[f32]) -> Result<[f32; N_FIELDS], MlError> {
    values.try_into().map_err(|_| MlError::ShapeMismatch {
        what,
        got: values.len(),
        expected: N_FIELDS,
    })
}

/// How well the fitted model does on both partitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub train_accuracy: f32,
    pub test_accuracy: f32,
    /// Computed over the test partition.
    pub confusion: ConfusionMatrix,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub n_samples: usize,
    pub skipped_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub stratified: bool,
    pub formulation: Formulation,
    pub fit_stats: FitStats,
    pub evaluation: Evaluation,
    pub model: EmbeddedModel,
    pub feature_names: Vec<String>,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Using dual={} for LinearSVC (n_samples={}, n_features={})",
            self.formulation == Formulation::Dual,
            self.n_train,
            N_FIELDS
        )?;
        writeln!(
            f,
            "Trained on {} samples, tested on {} ({} split, {} rows skipped)",
            self.n_train,
            self.n_test,
            if self.stratified { "stratified" } else { "random" },
            self.skipped_rows
        )?;

        self.fmt_evaluation(f)?;
        self.fmt_parameters(f)?;
        self.fmt_usage(f)
    }
}

impl TrainingReport {
    fn fmt_evaluation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Evaluation {
            train_accuracy,
            test_accuracy,
            confusion: cm,
        } = self.evaluation;

        writeln!(f, "\n--- Model Evaluation ---")?;
        writeln!(f, "Training Accuracy: {train_accuracy:.4}")?;
        writeln!(f, "Test Accuracy: {test_accuracy:.4}")?;

        writeln!(f, "\nConfusion Matrix (Test Set):")?;
        writeln!(f, "{cm}")?;
        writeln!(f, "  True Negatives (Correctly False): {}", cm.tn)?;
        writeln!(f, "  False Positives (Incorrectly Non-False): {}", cm.fp)?;
        writeln!(f, "  False Negatives (Incorrectly False): {}", cm.fn_)?;
        writeln!(f, "  True Positives (Correctly Non-False): {}", cm.tp)
    }

    fn fmt_parameters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = &self.model;

        writeln!(f, "\n--- SVM Model Parameters (for ESP32) ---")?;
        writeln!(f, "Scaler Means (for each feature):")?;
        self.fmt_per_feature(f, &model.means)?;
        writeln!(f, "\nScaler Scales (standard deviations for each feature):")?;
        self.fmt_per_feature(f, &model.scales)?;
        writeln!(f, "\nSVM Coefficients (weights for each scaled feature):")?;
        self.fmt_per_feature(f, &model.weights)?;
        writeln!(f, "\nSVM Intercept:")?;
        writeln!(f, "{}", model.bias)?;

        writeln!(f, "\nAs C constants:")?;
        writeln!(f, "const float SCALER_MEAN[{N_FIELDS}] = {{{}}};", c_floats(&model.means))?;
        writeln!(f, "const float SCALER_SCALE[{N_FIELDS}] = {{{}}};", c_floats(&model.scales))?;
        writeln!(f, "const float SVM_COEF[{N_FIELDS}] = {{{}}};", c_floats(&model.weights))?;
        writeln!(f, "const float SVM_INTERCEPT = {};", c_float(model.bias))
    }

    fn fmt_per_feature(&self, f: &mut fmt::Formatter<'_>, values: &[f32]) -> fmt::Result {
        let width = self.feature_names.iter().map(String::len).max().unwrap_or(0);
        for (name, value) in self.feature_names.iter().zip(values) {
            writeln!(f, "  {name:<width$}  {value}")?;
        }
        Ok(())
    }

    fn fmt_usage(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n--- How to use on ESP32 (Conceptual) ---")?;
        writeln!(
            f,
            "1. Store the {N_FIELDS} 'Scaler Means', {N_FIELDS} 'Scaler Scales', {N_FIELDS} 'SVM \
             Coefficients', and 1 'SVM Intercept' as constants in your ESP32 code."
        )?;
        writeln!(f, "2. For new sensor readings (raw_f1, ..., raw_f{N_FIELDS}):")?;
        writeln!(f, "   a. Scale each feature: scaled_fi = (raw_fi - mean_i) / scale_i")?;
        writeln!(
            f,
            "   b. Calculate decision value: sum(scaled_fi * coef_i for i in 1..{N_FIELDS}) + intercept"
        )?;
        writeln!(
            f,
            "3. If decision value >= 0, classify as 'Non-False Alarm' (or class 1). \
             Otherwise, 'False Alarm' (or class 0)."
        )
    }
}

fn c_float(value: f32) -> String {
    format!("{value:?}f")
}

fn c_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|&v| c_float(v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> EmbeddedModel {
        EmbeddedModel::new(
            &[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 500.0],
            &[2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 100.0],
            &[0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0],
            -0.25,
        )
        .unwrap()
    }

    #[test]
    fn decision_scales_then_weighs() {
        let raw = [12.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 600.0];
        // (12 - 10) / 2 * 0.5 + (600 - 500) / 100 * 2 - 0.25
        assert_eq!(model().decision(&raw), 0.5 + 2.0 - 0.25);
        assert_eq!(model().classify(&raw), NON_FALSE_ALARM);
    }

    #[test]
    fn zero_decision_is_an_alarm() {
        let m = EmbeddedModel {
            bias: 0.0,
            ..model()
        };
        assert_eq!(m.classify(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 500.0]), NON_FALSE_ALARM);
        assert_eq!(m.classify(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 499.0]), FALSE_ALARM);
    }

    #[test]
    fn new_rejects_wrong_lengths() {
        let err = EmbeddedModel::new(&[0.0; 7], &[1.0; 8], &[0.0; 8], 0.0).unwrap_err();
        assert_eq!(
            err,
            MlError::ShapeMismatch {
                what: "means",
                got: 7,
                expected: N_FIELDS
            }
        );
    }

    #[test]
    fn c_constants_are_valid_float_literals() {
        assert_eq!(c_float(1.0), "1.0f");
        assert_eq!(c_floats(&[0.5, -2.0]), "0.5f, -2.0f");
    }
}
