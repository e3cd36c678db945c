//! The stages of a training run. Each one either hands its output to the next
//! or ends the run with a `PipelineError`.

use log::{debug, info};
use ml_core::{
    Classifier, Dataset, FitStats, LinearSvc, StandardScaler, TrainTestSplit, metrics,
    train_test_split,
};
use ndarray::Array2;

use crate::{
    configs::PipelineConfig,
    error::{PipelineError, Stage},
    feed::{Labeler, LoadedFeed, load_feed},
    report::{EmbeddedModel, Evaluation},
};

/// Train and test partitions, standardized with training statistics.
pub struct ScaledSplit {
    pub scaler: StandardScaler,
    pub x_train: Array2<f32>,
    pub x_test: Array2<f32>,
    pub split: TrainTestSplit,
}

/// Loads the feed and checks that it can be trained on.
///
/// # Errors
/// `FileNotFound`, `Io` or `ParseError` when the document cannot be read,
/// `EmptyDataset` when it has no usable readings and `SingleClass` when all of
/// them got the same label.
pub fn load<L>(config: &PipelineConfig, labeler: &L) -> Result<(LoadedFeed, Dataset), PipelineError>
where
    L: Labeler + ?Sized,
{
    info!("loading feed from {}", config.feed_path.display());
    let feed = load_feed(&config.feed_path, labeler)?;

    if feed.is_empty() {
        return Err(PipelineError::EmptyDataset {
            skipped: feed.skipped.len(),
        });
    }

    let dataset = feed.to_dataset().map_err(PipelineError::Split)?;
    if let [class] = dataset.classes().as_slice() {
        return Err(PipelineError::SingleClass {
            stage: Stage::Dataset,
            class: *class,
        });
    }

    let [negatives, positives] = dataset.class_counts();
    info!(
        "labelled {} readings of {} features with '{}': {negatives} false alarms, \
         {positives} real alarms",
        dataset.len(),
        dataset.n_features(),
        labeler.describe()
    );

    Ok((feed, dataset))
}

/// Splits the dataset and standardizes both partitions.
///
/// # Errors
/// `Split` if the dataset cannot be partitioned, `SingleClass` if the training
/// partition ended up with a single class.
pub fn split_and_scale(
    config: &PipelineConfig,
    dataset: &Dataset,
) -> Result<ScaledSplit, PipelineError> {
    let split =
        train_test_split(dataset, config.test_size, config.seed).map_err(PipelineError::Split)?;

    if let [class] = split.train.classes().as_slice() {
        return Err(PipelineError::SingleClass {
            stage: Stage::TrainSplit,
            class: *class,
        });
    }

    let scaler = StandardScaler::fit(split.train.records()).map_err(PipelineError::Split)?;
    let x_train = scaler
        .transform(split.train.records())
        .map_err(PipelineError::Split)?;
    let x_test = scaler
        .transform(split.test.records())
        .map_err(PipelineError::Split)?;

    debug!("scaler means={} scales={}", scaler.mean(), scaler.scale());

    Ok(ScaledSplit {
        scaler,
        x_train,
        x_test,
        split,
    })
}

/// Fits a linear SVC on the scaled training partition.
///
/// # Errors
/// `TrainingError` if the classifier rejects the data.
pub fn fit(
    config: &PipelineConfig,
    data: &ScaledSplit,
) -> Result<(LinearSvc, FitStats), PipelineError> {
    let mut svc = LinearSvc::new(config.svc_params());
    let stats = svc
        .fit(data.x_train.view(), data.split.train.labels())
        .map_err(PipelineError::TrainingError)?;

    Ok((svc, stats))
}

/// Scores the fitted classifier on both partitions.
///
/// # Errors
/// `TrainingError` if the classifier cannot predict.
pub fn evaluate(svc: &LinearSvc, data: &ScaledSplit) -> Result<Evaluation, PipelineError> {
    let y_train = data.split.train.labels();
    let y_test = data.split.test.labels();

    let train_pred = svc
        .predict(data.x_train.view())
        .map_err(PipelineError::TrainingError)?;
    let test_pred = svc
        .predict(data.x_test.view())
        .map_err(PipelineError::TrainingError)?;

    Ok(Evaluation {
        train_accuracy: metrics::accuracy(y_train, &train_pred)
            .map_err(PipelineError::TrainingError)?,
        test_accuracy: metrics::accuracy(y_test, &test_pred)
            .map_err(PipelineError::TrainingError)?,
        confusion: metrics::ConfusionMatrix::from_labels(y_test, &test_pred)
            .map_err(PipelineError::TrainingError)?,
    })
}

/// Collects the constants to port to the microcontroller.
///
/// # Errors
/// `TrainingError` if the classifier is not fitted or has the wrong width.
pub fn export(svc: &LinearSvc, scaler: &StandardScaler) -> Result<EmbeddedModel, PipelineError> {
    let not_fitted = || PipelineError::TrainingError(ml_core::MlError::NotFitted("linear svc"));
    let coef = svc.coef().ok_or_else(not_fitted)?;
    let bias = svc.intercept().ok_or_else(not_fitted)?;

    EmbeddedModel::new(
        &scaler.mean().to_vec(),
        &scaler.scale().to_vec(),
        &coef.to_vec(),
        bias,
    )
    .map_err(PipelineError::TrainingError)
}
