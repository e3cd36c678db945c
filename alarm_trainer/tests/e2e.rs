use std::{io::Write, path::PathBuf};

use alarm_trainer::{
    Labeler, PipelineConfig, PipelineError, Stage, ThresholdLabeler,
    feed::{Reading, RowConversionError, load_feed},
    train,
};
use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn write_feed(doc: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{doc}").unwrap();
    file
}

fn config_for(file: &NamedTempFile) -> PipelineConfig {
    PipelineConfig {
        feed_path: file.path().to_path_buf(),
        ..Default::default()
    }
}

/// 10 readings with a CO level of 1000 and 10 with none; the other channels
/// drift a bit so no two rows are equal.
fn synthetic_feeds() -> Vec<Value> {
    (0..20)
        .map(|i| {
            let co = if i % 2 == 0 { "1000" } else { "0" };
            json!({
                "created_at": format!("2024-05-01T10:{i:02}:00Z"),
                "entry_id": i + 1,
                "field1": format!("{}", 100 + i * 3),
                "field2": format!("{}", 80 + (i * 7) % 11),
                "field3": 40 + i,
                "field4": format!("{}.5", 20 + i % 4),
                "field5": "12",
                "field6": format!("{}", 300 - i),
                "field7": 5 + (i * 5) % 13,
                "field8": co,
            })
        })
        .collect()
}

#[test]
fn synthetic_feed_trains_and_reports_all_constants() {
    let file = write_feed(&json!({ "feeds": synthetic_feeds() }));
    let config = config_for(&file);

    let report = train(&config, &config.labeler()).unwrap();

    assert_eq!(report.n_samples, 20);
    assert_eq!(report.skipped_rows, 0);
    assert_eq!(report.n_train + report.n_test, 20);
    assert_eq!(report.n_test, 5);
    assert!(report.stratified);

    let eval = report.evaluation;
    assert!((0.0..=1.0).contains(&eval.train_accuracy));
    assert!((0.0..=1.0).contains(&eval.test_accuracy));
    assert_eq!(eval.confusion.total(), report.n_test);

    let model = &report.model;
    assert_eq!(model.means.len(), 8);
    assert_eq!(model.scales.len(), 8);
    assert_eq!(model.weights.len(), 8);
    assert!(model.bias.is_finite());
    assert!(model.scales.iter().all(|&s| s > 0.0));
    assert!(model.weights[7] > 0.0, "CO should push towards real alarms");

    let printed = report.to_string();
    for section in [
        "Training Accuracy:",
        "Test Accuracy:",
        "Confusion Matrix (Test Set):",
        "Scaler Means (for each feature):",
        "Scaler Scales (standard deviations for each feature):",
        "SVM Coefficients (weights for each scaled feature):",
        "SVM Intercept:",
        "If decision value >= 0",
    ] {
        assert!(printed.contains(section), "missing '{section}' in:\n{printed}");
    }
}

#[test]
fn exported_model_classifies_the_training_feed() {
    let file = write_feed(&json!({ "feeds": synthetic_feeds() }));
    let config = config_for(&file);
    let labeler = config.labeler();

    let report = train(&config, &labeler).unwrap();

    let hits = synthetic_feeds()
        .iter()
        .map(|entry| Reading::from_entry(entry).unwrap())
        .filter(|r| report.model.classify(r.values()) == labeler.label(r))
        .count();
    assert!(hits >= 18, "only {hits} of 20 readings classified as labelled");
}

#[test]
fn training_is_reproducible() {
    let file = write_feed(&json!({ "feeds": synthetic_feeds() }));
    let config = config_for(&file);

    let a = train(&config, &config.labeler()).unwrap();
    let b = train(&config, &config.labeler()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn non_numeric_co_drops_exactly_that_row() {
    let mut feeds = synthetic_feeds();
    feeds.push(json!({ "field1": "1", "field8": "abc" }));
    let file = write_feed(&json!({ "feeds": feeds }));
    let config = config_for(&file);

    let report = train(&config, &config.labeler()).unwrap();
    assert_eq!(report.n_samples, 20);
    assert_eq!(report.skipped_rows, 1);
}

#[test]
fn skipped_row_explains_the_conversion_failure() {
    let mut feeds = synthetic_feeds();
    feeds.push(json!({ "field1": "1", "field8": "abc" }));
    let file = write_feed(&json!({ "feeds": feeds }));

    let feed = load_feed(file.path(), &ThresholdLabeler::carbon_monoxide(500.0)).unwrap();
    assert_eq!(feed.skipped.len(), 1);

    let skipped = &feed.skipped[0];
    assert_eq!(skipped.index, 20);
    assert_eq!(
        skipped.error,
        RowConversionError::NotNumeric {
            field: "field8",
            value: "abc".into()
        }
    );
    assert_eq!(
        skipped.error.to_string(),
        "field8: could not convert string to float: 'abc'"
    );
}

#[test]
fn out_of_range_reading_is_skipped_and_training_goes_on() {
    let mut feeds = synthetic_feeds();
    feeds.push(json!({ "field1": 1e39, "field8": 0 }));
    let file = write_feed(&json!({ "feeds": feeds }));
    let config = config_for(&file);

    let report = train(&config, &config.labeler()).unwrap();
    assert_eq!(report.n_samples, 20);
    assert_eq!(report.skipped_rows, 1);
    assert!(report.model.means.iter().all(|m| m.is_finite()));
}

#[test]
fn channel_names_show_up_in_the_report() {
    let doc = json!({
        "channel": { "field1": "LPG", "field4": "Smoke", "field8": "CO" },
        "feeds": synthetic_feeds(),
    });
    let file = write_feed(&doc);
    let config = config_for(&file);

    let report = train(&config, &config.labeler()).unwrap();
    assert_eq!(report.feature_names[3], "field4 (Smoke)");
    assert!(report.to_string().contains("field8 (CO)"));
}

#[test]
fn missing_file_is_reported_without_a_model() {
    let config = PipelineConfig {
        feed_path: PathBuf::from("/no/such/dir/feed.json"),
        ..Default::default()
    };

    let err = train(&config, &config.labeler()).unwrap_err();
    assert!(matches!(err, PipelineError::FileNotFound(_)), "{err}");
}

#[test]
fn invalid_json_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"feeds\": [").unwrap();
    let config = config_for(&file);

    let err = train(&config, &config.labeler()).unwrap_err();
    assert!(matches!(err, PipelineError::ParseError { .. }), "{err}");
}

#[test]
fn empty_feeds_is_an_empty_dataset() {
    let file = write_feed(&json!({ "feeds": [] }));
    let config = config_for(&file);

    let err = train(&config, &config.labeler()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyDataset { skipped: 0 }), "{err}");
}

#[test]
fn all_rows_invalid_is_an_empty_dataset() {
    let file = write_feed(&json!({ "feeds": [{ "field8": "x" }, { "field1": [] }] }));
    let config = config_for(&file);

    let err = train(&config, &config.labeler()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyDataset { skipped: 2 }), "{err}");
}

#[test]
fn single_class_dataset_halts_before_training() {
    let file = write_feed(&json!({ "feeds": synthetic_feeds() }));
    let config = PipelineConfig {
        threshold: 5000.0,
        ..config_for(&file)
    };

    let err = train(&config, &config.labeler()).unwrap_err();
    assert!(
        matches!(
            err,
            PipelineError::SingleClass {
                stage: Stage::Dataset,
                class: 0
            }
        ),
        "{err}"
    );
}

#[test]
fn lone_positive_may_vanish_from_the_training_split() {
    let feeds: Vec<Value> = (0..8)
        .map(|i| json!({ "field1": i, "field8": if i == 3 { 900 } else { 10 } }))
        .collect();
    let file = write_feed(&json!({ "feeds": feeds }));

    let mut aborted = 0;
    let mut trained = 0;
    for seed in 0..64 {
        let config = PipelineConfig {
            seed,
            ..config_for(&file)
        };

        match train(&config, &config.labeler()) {
            Ok(report) => {
                assert!(!report.stratified);
                trained += 1;
            }
            Err(PipelineError::SingleClass {
                stage: Stage::TrainSplit,
                class: 0,
            }) => aborted += 1,
            Err(other) => panic!("unexpected error with seed {seed}: {other}"),
        }
    }

    assert!(aborted > 0, "the positive sample never landed in the test set");
    assert!(trained > 0, "the positive sample never landed in the train set");
}

#[test]
fn labeling_strategy_is_pluggable() {
    let file = write_feed(&json!({ "feeds": synthetic_feeds() }));
    let config = config_for(&file);

    // Smoke-based rule instead of the CO threshold.
    let smoke = ThresholdLabeler::new(4, 21.0).unwrap();
    let report = train(&config, &smoke).unwrap();
    assert_eq!(report.n_samples, 20);

    let closure = |r: &Reading| u8::from(r.field(1) > 130.0);
    let report = train(&config, &closure).unwrap();
    assert_eq!(report.n_samples, 20);
}
