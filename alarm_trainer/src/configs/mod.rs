mod overrides;
mod pipeline;

pub use overrides::{FEED_PATH_VAR, THRESHOLD_VAR, resolve};
pub use pipeline::PipelineConfig;
