use std::{fs, io, path::Path};

use log::{info, warn};
use ml_core::{Dataset, Label};
use serde::Deserialize;
use serde_json::Value;

use super::{
    labeler::Labeler,
    reading::{FIELD_KEYS, N_FIELDS, Reading, RowConversionError},
};
use crate::error::PipelineError;

/// The parts of a channel feed export the trainer cares about.
#[derive(Debug, Deserialize)]
struct FeedDocument {
    #[serde(default)]
    channel: Option<Value>,
    #[serde(default)]
    feeds: Option<Vec<Value>>,
}

/// A feed entry that was dropped because it could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Position of the entry in the `feeds` array.
    pub index: usize,
    pub entry: Value,
    pub error: RowConversionError,
}

/// The labelled readings extracted from a feed document, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFeed {
    pub readings: Vec<Reading>,
    pub labels: Vec<Label>,
    pub skipped: Vec<SkippedRow>,
    /// One display name per channel, e.g. `field8 (CO)`.
    pub feature_names: Vec<String>,
}

impl LoadedFeed {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Packs the readings into an `n × 8` dataset.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if readings and labels went out of sync.
    pub fn to_dataset(&self) -> ml_core::Result<Dataset> {
        let rows: Vec<[f32; N_FIELDS]> = self.readings.iter().map(|r| *r.values()).collect();
        Dataset::from_rows(&rows, self.labels.clone())
    }
}

/// Reads and labels the feed stored at `path`.
///
/// # Errors
/// Returns `PipelineError::FileNotFound` if `path` does not exist,
/// `PipelineError::Io` if it cannot be read, and `PipelineError::ParseError` if
/// its content is not a JSON object.
pub fn load_feed<L>(path: &Path, labeler: &L) -> Result<LoadedFeed, PipelineError>
where
    L: Labeler + ?Sized,
{
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PipelineError::FileNotFound(path.to_path_buf()),
        _ => PipelineError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    parse_feed(&content, labeler).map_err(|source| PipelineError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Labels the readings of an in-memory feed document.
///
/// Entries that cannot be converted are skipped with a warning; they never make
/// the whole document fail.
///
/// # Errors
/// Returns the JSON error if `content` is not a valid feed document.
pub fn parse_feed<L>(content: &str, labeler: &L) -> Result<LoadedFeed, serde_json::Error>
where
    L: Labeler + ?Sized,
{
    let document: FeedDocument = serde_json::from_str(content)?;
    let feature_names = feature_names(document.channel.as_ref());
    let feeds = document.feeds.unwrap_or_default();

    if feeds.is_empty() {
        warn!("no 'feeds' data found in the document");
    }

    let mut readings = Vec::with_capacity(feeds.len());
    let mut labels = Vec::with_capacity(feeds.len());
    let mut skipped = Vec::new();

    for (index, entry) in feeds.into_iter().enumerate() {
        match Reading::from_entry(&entry) {
            Ok(reading) => {
                labels.push(labeler.label(&reading));
                readings.push(reading);
            }
            Err(error) => {
                warn!("skipping entry {index} due to a data conversion error: {entry}: {error}");
                skipped.push(SkippedRow {
                    index,
                    entry,
                    error,
                });
            }
        }
    }

    if readings.is_empty() && !skipped.is_empty() {
        warn!("no valid data could be extracted, all {} entries were skipped", skipped.len());
    } else {
        info!("loaded {} readings ({} skipped)", readings.len(), skipped.len());
    }

    Ok(LoadedFeed {
        readings,
        labels,
        skipped,
        feature_names,
    })
}

/// Names each channel after the channel metadata when the document has it.
fn feature_names(channel: Option<&Value>) -> Vec<String> {
    FIELD_KEYS
        .iter()
        .map(|&key| {
            match channel.and_then(|c| c.get(key)).and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => format!("{key} ({})", name.trim()),
                _ => key.to_string(),
            }
        })
        .collect()
}
