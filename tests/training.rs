mod common;

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use pretty_assertions::assert_eq;
use text_clf::{
    artifacts,
    pipelines::text_classification::{self, Classifier, EncoderError, Pipeline},
};

type B = Autodiff<NdArray>;

#[test]
fn test_train_and_report() {
    let dir = common::temp_dir("train");
    let config = common::experiment(&dir);

    let output = text_classification::run::<B>(&config, &NdArrayDevice::default()).unwrap();

    let labels = output
        .report
        .classes
        .iter()
        .map(|class| class.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["neg", "pos"]);

    for class in &output.report.classes {
        assert!((0.0..=1.0).contains(&class.precision));
        assert!((0.0..=1.0).contains(&class.recall));
    }
    assert_eq!(output.report.support, 20);
    assert!(output.report.accuracy >= 0.9);

    assert_eq!(
        output.artifact_path,
        artifacts::artifact_path(&config.output.artifacts_dir, "model")
    );
    assert!(std::fs::metadata(&output.artifact_path).unwrap().len() > 0);
}

#[test]
fn test_reloaded_pipeline_predicts_the_same() {
    let dir = common::temp_dir("round-trip");
    let config = common::experiment(&dir);
    let device = NdArrayDevice::default();

    let output = text_classification::run::<B>(&config, &device).unwrap();
    let reloaded = Pipeline::load(&output.artifact_path).unwrap();

    let texts = common::reviews(10, 7)
        .into_iter()
        .map(|(text, _)| text)
        .chain(["an unseen sentence".to_string()])
        .collect::<Vec<_>>();

    let before = output.pipeline.predict_proba::<NdArray>(&texts, &device);
    let after = reloaded.predict_proba::<NdArray>(&texts, &device);

    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().flatten().zip(after.iter().flatten()) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }
}

#[test]
fn test_training_twice_into_the_same_directory() {
    let dir = common::temp_dir("twice");
    let config = common::experiment(&dir);
    let device = NdArrayDevice::default();

    text_classification::run::<B>(&config, &device).unwrap();
    let output = text_classification::run::<B>(&config, &device).unwrap();

    assert!(output.artifact_path.is_file());
}

#[test]
fn test_unseen_test_label() {
    let dir = common::temp_dir("unseen");
    let config = common::experiment(&dir);

    let mut test = common::reviews(4, 0);
    test[0].1 = "meh".to_string();
    common::write_csv(&config.data.test_data_path, &test);

    let err = text_classification::run::<B>(&config, &NdArrayDevice::default()).unwrap_err();

    assert_eq!(
        err.downcast_ref::<EncoderError>(),
        Some(&EncoderError::UnseenLabel("meh".to_string()))
    );
    assert!(!config.output.artifacts_dir.exists());
}
