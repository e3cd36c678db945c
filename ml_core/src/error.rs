use std::fmt;

/// The result type used across the numeric core.
pub type Result<T> = std::result::Result<T, MlError>;

/// Errors produced by estimators and helpers when inputs are invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "labels", "features").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// An operation that needs at least one sample received none.
    EmptyInput(&'static str),

    /// A split would leave one of its partitions without samples.
    EmptySplit {
        n_samples: usize,
        n_train: usize,
        n_test: usize,
    },

    /// A classifier needs at least two distinct classes to be fitted.
    SingleClass { class: u8 },

    /// A label outside of the binary `{0, 1}` domain was found.
    InvalidLabel { index: usize, label: u8 },

    /// A feature value is NaN or infinite.
    NonFinite { row: usize, col: usize },

    /// The estimator was used before `fit`.
    NotFitted(&'static str),
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::EmptyInput(what) => write!(f, "cannot use an empty {what}"),
            MlError::EmptySplit {
                n_samples,
                n_train,
                n_test,
            } => write!(
                f,
                "splitting {n_samples} samples leaves an empty partition \
                 (train={n_train}, test={n_test})"
            ),
            MlError::SingleClass { class } => write!(
                f,
                "at least two classes are required, but only class {class} is present"
            ),
            MlError::InvalidLabel { index, label } => {
                write!(f, "label {label} at sample {index} is not a binary label")
            }
            MlError::NonFinite { row, col } => {
                write!(f, "feature {col} of sample {row} is not a finite number")
            }
            MlError::NotFitted(what) => write!(f, "{what} has not been fitted"),
        }
    }
}

impl std::error::Error for MlError {}
