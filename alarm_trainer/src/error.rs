use std::{fmt, io, path::PathBuf};

use ml_core::{Label, MlError};

/// Where a single-class condition was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The whole labelled dataset.
    Dataset,
    /// The training partition, after splitting.
    TrainSplit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Dataset => write!(f, "the entire dataset"),
            Stage::TrainSplit => write!(f, "the training data after the split"),
        }
    }
}

/// All errors that end a training run early.
#[derive(Debug)]
pub enum PipelineError {
    /// Invalid configuration, caught before reading anything.
    InvalidConfig(String),
    /// The feed file does not exist.
    FileNotFound(PathBuf),
    /// The feed file exists but could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The feed file is not a valid JSON feed document.
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// No usable readings were found.
    EmptyDataset { skipped: usize },
    /// Only one class is present, so no separating hyperplane exists.
    SingleClass { stage: Stage, class: Label },
    /// The dataset could not be split or scaled.
    Split(MlError),
    /// The classifier could not be fitted or evaluated.
    TrainingError(MlError),
}

impl PipelineError {
    /// A hint on how to get a successful run, when there is one.
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::FileNotFound(_) => {
                Some("pass the feed path as the first argument or through FEED_PATH")
            }
            Self::EmptyDataset { skipped: 0 } => {
                Some("the document needs a non-empty 'feeds' array")
            }
            Self::EmptyDataset { .. } => {
                Some("every entry failed numeric conversion, check the field values")
            }
            Self::SingleClass { .. } => Some(
                "adjust the labeling threshold (CO_THRESHOLD) or provide data that results \
                 in both classes",
            ),
            Self::TrainingError(_) => Some(
                "check the data, the labeling strategy, and that there are enough diverse \
                 samples of both classes",
            ),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::FileNotFound(path) => {
                write!(f, "the file {} was not found", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "could not read {}: {source}", path.display())
            }
            Self::ParseError { path, source } => {
                write!(f, "could not decode JSON from {}: {source}", path.display())
            }
            Self::EmptyDataset { skipped: 0 } => write!(f, "no data available for training"),
            Self::EmptyDataset { skipped } => write!(
                f,
                "no valid data could be extracted for training ({skipped} entries skipped)"
            ),
            Self::SingleClass { stage, class } => write!(
                f,
                "{stage} contains only class {class}, training requires at least two classes"
            ),
            Self::Split(e) => write!(f, "could not prepare the training data: {e}"),
            Self::TrainingError(e) => write!(f, "error during model training: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::ParseError { source, .. } => Some(source),
            Self::Split(e) | Self::TrainingError(e) => Some(e),
            _ => None,
        }
    }
}
