use std::path::PathBuf;

use super::PipelineConfig;
use crate::error::PipelineError;

/// Environment variable holding the feed path.
pub const FEED_PATH_VAR: &str = "FEED_PATH";
/// Environment variable holding the labeling threshold.
pub const THRESHOLD_VAR: &str = "CO_THRESHOLD";

/// Builds the run configuration out of the defaults and the process surroundings.
///
/// The feed path is the first argument, else `FEED_PATH`, else the default.
/// The threshold comes from `CO_THRESHOLD` when set.
///
/// # Arguments
/// * `args` - The command line arguments, without the program name.
/// * `env` - Looks up an environment variable.
///
/// # Errors
/// Returns `PipelineError::InvalidConfig` if an override cannot be parsed or the
/// resulting config is invalid.
pub fn resolve<I, E>(args: I, env: E) -> Result<PipelineConfig, PipelineError>
where
    I: IntoIterator<Item = String>,
    E: Fn(&str) -> Option<String>,
{
    let mut config = PipelineConfig::default();
    let mut args = args.into_iter();

    if let Some(path) = args.next().or_else(|| env(FEED_PATH_VAR)) {
        config.feed_path = PathBuf::from(path);
    }

    if let Some(extra) = args.next() {
        return Err(PipelineError::InvalidConfig(format!(
            "unexpected argument '{extra}', usage: alarm_trainer [FEED_PATH]"
        )));
    }

    if let Some(raw) = env(THRESHOLD_VAR) {
        config.threshold = raw.trim().parse().map_err(|e| {
            PipelineError::InvalidConfig(format!("{THRESHOLD_VAR}='{raw}' is not a number: {e}"))
        })?;
    }

    config.validate()?;
    Ok(config)
}
