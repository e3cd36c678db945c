pub mod configs;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod report;

use ml_core::MlError;

pub use configs::PipelineConfig;
pub use error::{PipelineError, Stage};
pub use feed::{Labeler, ThresholdLabeler};
pub use report::{EmbeddedModel, Evaluation, TrainingReport};

/// Runs a whole training session: load, label, split, scale, fit and evaluate.
///
/// Nothing is written anywhere; the returned report holds the metrics and the
/// model constants.
///
/// # Errors
/// Returns a `PipelineError` describing the stage that ended the run.
pub fn train<L>(config: &PipelineConfig, labeler: &L) -> Result<TrainingReport, PipelineError>
where
    L: Labeler + ?Sized,
{
    config.validate()?;

    let (feed, dataset) = pipeline::load(config, labeler)?;
    let data = pipeline::split_and_scale(config, &dataset)?;
    log::info!(
        "split {} samples into {} train / {} test",
        dataset.len(),
        data.split.train.len(),
        data.split.test.len()
    );

    let (svc, fit_stats) = pipeline::fit(config, &data)?;
    let formulation = svc
        .formulation()
        .ok_or(PipelineError::TrainingError(MlError::NotFitted("linear svc")))?;

    let evaluation = pipeline::evaluate(&svc, &data)?;
    let model = pipeline::export(&svc, &data.scaler)?;

    Ok(TrainingReport {
        n_samples: dataset.len(),
        skipped_rows: feed.skipped.len(),
        n_train: data.split.train.len(),
        n_test: data.split.test.len(),
        stratified: data.split.stratified,
        formulation,
        fit_stats,
        evaluation,
        model,
        feature_names: feed.feature_names,
    })
}
