use ml_core::Label;

use super::reading::{N_FIELDS, Reading};

/// Class of readings that are real alarms.
pub const NON_FALSE_ALARM: Label = 1;
/// Class of readings that are false alarms.
pub const FALSE_ALARM: Label = 0;

/// Strategy that decides the class of a reading.
///
/// The feed carries no ground truth, so labels are derived from the readings
/// themselves. Any closure `Fn(&Reading) -> Label` is a labeler too.
pub trait Labeler {
    /// Returns `NON_FALSE_ALARM` or `FALSE_ALARM` for `reading`.
    fn label(&self, reading: &Reading) -> Label;

    /// Short human-readable description of the rule, used in diagnostics.
    fn describe(&self) -> String {
        "custom labeling rule".into()
    }
}

impl<F> Labeler for F
where
    F: Fn(&Reading) -> Label,
{
    fn label(&self, reading: &Reading) -> Label {
        self(reading)
    }
}

/// Labels a reading as a real alarm when one channel exceeds a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdLabeler {
    field: usize,
    threshold: f32,
}

impl ThresholdLabeler {
    /// Creates a new `ThresholdLabeler`.
    ///
    /// # Arguments
    /// * `field` - The channel to look at, counting from 1 like the field keys.
    /// * `threshold` - Values strictly above it are real alarms.
    ///
    /// # Returns
    /// `None` if `field` is not a valid channel.
    pub fn new(field: usize, threshold: f32) -> Option<Self> {
        (1..=N_FIELDS)
            .contains(&field)
            .then_some(Self { field, threshold })
    }

    /// Thresholds the CO channel (`field8`), in ppm.
    pub fn carbon_monoxide(threshold: f32) -> Self {
        Self {
            field: N_FIELDS,
            threshold,
        }
    }
}

impl Labeler for ThresholdLabeler {
    fn label(&self, reading: &Reading) -> Label {
        if reading.field(self.field) > self.threshold {
            NON_FALSE_ALARM
        } else {
            FALSE_ALARM
        }
    }

    fn describe(&self) -> String {
        format!("field{} > {}", self.field, self.threshold)
    }
}
