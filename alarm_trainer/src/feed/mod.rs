//! Sensor feed documents: parsing entries into readings and labelling them.

mod labeler;
mod loader;
mod reading;

pub use labeler::{FALSE_ALARM, Labeler, NON_FALSE_ALARM, ThresholdLabeler};
pub use loader::{LoadedFeed, SkippedRow, load_feed, parse_feed};
pub use reading::{FIELD_KEYS, N_FIELDS, Reading, RowConversionError};
