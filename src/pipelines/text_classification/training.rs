use std::path::PathBuf;

use burn::tensor::{backend::AutodiffBackend, Data, Int, Shape, Tensor};

use crate::{
    artifacts::{self, CONFIG_FILE, TARGET_NAMES_FILE},
    config::Config,
    datasets,
    metrics::Report,
    utils::files,
};

use super::{model, Item, LabelEncoder, Pipeline, TfidfVectorizer};

/// The result of a training run
#[derive(Clone, Debug)]
pub struct Output {
    /// The fitted pipeline
    pub pipeline: Pipeline,

    /// Evaluation on the test split
    pub report: Report,

    /// Where the pipeline was written
    pub artifact_path: PathBuf,
}

/// Load the configured splits and train on them
pub fn run<B: AutodiffBackend>(config: &Config, device: &B::Device) -> anyhow::Result<Output> {
    let split = datasets::load_data(&config.data)?;

    log::info!(
        "Loaded {} train and {} test examples",
        split.train.len(),
        split.test.len()
    );

    train::<B, _>(split.train.examples(), split.test.examples(), config, device)
}

/// Fit the pipeline on the train split, report on the test split, and persist the artifacts
pub fn train<B: AutodiffBackend, I: Item>(
    dataset_train: &[I], // Training examples
    dataset_test: &[I],  // Held-out examples, never fitted on
    config: &Config,     // Experiment configuration
    device: &B::Device,  // Device on which to perform computation
) -> anyhow::Result<Output> {
    let train_labels = dataset_train
        .iter()
        .map(Item::class_label)
        .collect::<Vec<_>>();
    let (encoder, y_train) = LabelEncoder::fit_transform(&train_labels);

    if encoder.n_classes() < 2 {
        return Err(TrainingError::TooFewClasses(encoder.n_classes()).into());
    }

    let test_labels = dataset_test
        .iter()
        .map(Item::class_label)
        .collect::<Vec<_>>();
    let y_test = encoder.transform(&test_labels)?;

    let train_texts = dataset_train.iter().map(Item::input).collect::<Vec<_>>();
    let test_texts = dataset_test.iter().map(Item::input).collect::<Vec<_>>();

    let vectorizer = TfidfVectorizer::fit(&config.tfidf, &train_texts)?;
    log::info!("Fitted vocabulary of {} terms", vectorizer.n_features());

    let features = vectorizer.transform::<B, _>(&train_texts, device);
    let targets = Tensor::<B, 1, Int>::from_ints(
        Data::new(
            y_train.iter().map(|&id| id as i32).collect::<Vec<_>>(),
            Shape::new([y_train.len()]),
        ),
        device,
    );

    let classifier = model::fit::<B>(
        features,
        targets,
        encoder.n_classes(),
        &config.logreg,
        device,
    );

    let pipeline = Pipeline::new(encoder, vectorizer, classifier);
    pipeline.validate()?;

    let y_pred = pipeline.predict::<B::InnerBackend, _>(&test_texts, device);
    let report = Report::new(&y_test, &y_pred, pipeline.target_names())?;

    println!("{report}");

    let artifact_path = save(&pipeline, config)?;

    Ok(Output {
        pipeline,
        report,
        artifact_path,
    })
}

/// Write the pipeline, its class names, and the config next to each other
fn save(pipeline: &Pipeline, config: &Config) -> anyhow::Result<PathBuf> {
    let dir = &config.output.artifacts_dir;
    files::ensure_dir(dir)?;

    let artifact_path = artifacts::artifact_path(dir, &config.output.model_name);
    pipeline.save(&artifact_path)?;

    files::write_json(dir.join(TARGET_NAMES_FILE), pipeline.target_names())?;

    // Diagnostics may run from another working directory
    let mut saved = config.clone();
    saved.data.train_data_path = files::absolute(&config.data.train_data_path)?;
    saved.data.test_data_path = files::absolute(&config.data.test_data_path)?;
    std::fs::write(dir.join(CONFIG_FILE), saved.to_yaml()?)?;

    log::info!("Saved model to {}", artifact_path.display());

    Ok(artifact_path)
}

/// Training Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TrainingError {
    /// A classifier needs at least two classes to discriminate between
    #[error("the training split must contain at least 2 classes, found {0}")]
    TooFewClasses(usize),
}
