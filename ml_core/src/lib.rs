//! Numeric building blocks for training small linear classifiers: datasets,
//! train/test splitting, feature standardization, a linear support vector
//! classifier and evaluation metrics.

mod data;
mod error;
pub mod metrics;
mod model;
mod preprocessing;
pub mod split;
mod stats;
pub mod svm;

pub use data::{Dataset, Label, class_counts};
pub use error::{MlError, Result};
pub use model::Classifier;
pub use preprocessing::StandardScaler;
pub use split::{TrainTestSplit, train_test_split};
pub use stats::FitStats;
pub use svm::{Formulation, FormulationPolicy, LinearSvc, LinearSvcParams};
