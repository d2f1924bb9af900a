use std::{
    fs,
    path::{Path, PathBuf},
};

use derive_new::new;

use crate::{
    artifacts::{self, CONFIG_EXTENSION, TARGET_NAMES_FILE},
    config::{Config, ConfigError},
    datasets::{self, DatasetError, Split},
    pipelines::text_classification::{ArtifactError, Pipeline},
    utils::files,
};

/// A saved model together with the held-out split it was evaluated on
#[derive(Clone, Debug, new)]
pub struct Resolved {
    /// The fitted pipeline
    pub model: Pipeline,

    /// Held-out test texts
    pub test_texts: Vec<String>,

    /// Held-out test class names
    pub test_labels: Vec<String>,
}

/// Load a saved binary classifier and its test split from a model directory
///
/// The directory must contain `model.json`, a `target_names.json` with exactly two class
/// names, and exactly one `*.yaml` experiment config. The class count and the config are
/// checked before any data is loaded or the model is deserialized.
pub fn get_model_and_data(model_dir: impl AsRef<Path>) -> Result<Resolved, ResolveError> {
    let model_dir = model_dir.as_ref();

    let model_path = artifacts::model_path(model_dir);

    let target_names = read_target_names(&model_dir.join(TARGET_NAMES_FILE))?;
    if target_names.len() != 2 {
        return Err(ResolveError::NotBinary(target_names.len()));
    }

    let config_path = find_config(model_dir)?;
    log::debug!("Using config {}", config_path.display());

    let config = Config::load(&config_path)?;

    let Split { test, .. } = datasets::load_data(&config.data)?;

    let model = Pipeline::load(&model_path)?;
    if model.target_names().len() != target_names.len() {
        return Err(ResolveError::ClassMismatch {
            model: model.target_names().len(),
            target_names: target_names.len(),
        });
    }

    log::info!(
        "Resolved model {} with {} test examples",
        model_path.display(),
        test.len()
    );

    Ok(Resolved::new(model, test.texts(), test.labels()))
}

fn read_target_names(path: &Path) -> Result<Vec<String>, ResolveError> {
    let json = fs::read_to_string(path)?;

    Ok(serde_json::from_str(&json)?)
}

/// The single experiment config inside the model directory
fn find_config(model_dir: &Path) -> Result<PathBuf, ResolveError> {
    let mut configs = files::find_files_with_extension(model_dir, CONFIG_EXTENSION)?;

    match configs.len() {
        0 => Err(ResolveError::MissingConfig(model_dir.to_path_buf())),
        1 => Ok(configs.remove(0)),
        _ => Err(ResolveError::AmbiguousConfig(configs)),
    }
}

/// Resolve Error
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// Curves are only defined for two classes
    #[error("The model must have 2 classes, but has {0} classes.")]
    NotBinary(usize),

    /// The model directory has no config file
    #[error("There is no config file (with .yaml extension) in {}.", .0.display())]
    MissingConfig(PathBuf),

    /// The model directory has more than one config file
    #[error("There are more than one config files (with .yaml extension): {0:?}.")]
    AmbiguousConfig(Vec<PathBuf>),

    /// The saved pipeline disagrees with `target_names.json`
    #[error("The model has {model} classes but target_names.json lists {target_names}.")]
    ClassMismatch {
        /// Number of classes known to the pipeline
        model: usize,
        /// Number of names in `target_names.json`
        target_names: usize,
    },

    /// A file could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `target_names.json` is not a JSON array of strings
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The config could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The test split could not be loaded
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The saved pipeline could not be loaded
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::files::{temp_dir, write_json};

    const CONFIG: &str = "\
data:
  train_data_path: does/not/exist/train.csv
  test_data_path: does/not/exist/test.csv
";

    fn model_dir(prefix: &str, target_names: &[&str], configs: &[&str]) -> PathBuf {
        let dir = temp_dir(prefix);
        write_json(dir.join(TARGET_NAMES_FILE), target_names).unwrap();

        for name in configs {
            fs::write(dir.join(name), CONFIG).unwrap();
        }

        dir
    }

    #[test]
    fn test_rejects_more_than_two_classes_before_anything_else() {
        // No config and no model: only the class count can have been checked
        let dir = model_dir("resolver-three", &["a", "b", "c"], &[]);

        let err = get_model_and_data(&dir).unwrap_err();

        assert!(matches!(err, ResolveError::NotBinary(3)));
        assert_eq!(
            err.to_string(),
            "The model must have 2 classes, but has 3 classes."
        );
    }

    #[test]
    fn test_rejects_single_class() {
        let dir = model_dir("resolver-one", &["a"], &["config.yaml"]);

        assert!(matches!(
            get_model_and_data(&dir),
            Err(ResolveError::NotBinary(1))
        ));
    }

    #[test]
    fn test_missing_config() {
        let dir = model_dir("resolver-missing", &["neg", "pos"], &[]);
        fs::write(dir.join("config.yml"), CONFIG).unwrap();

        assert!(matches!(
            get_model_and_data(&dir),
            Err(ResolveError::MissingConfig(ref path)) if path == &dir
        ));
    }

    #[test]
    fn test_ambiguous_config() {
        let dir = model_dir("resolver-ambiguous", &["neg", "pos"], &["a.yaml", "b.yaml"]);

        match get_model_and_data(&dir) {
            Err(ResolveError::AmbiguousConfig(found)) => {
                assert_eq!(found, vec![dir.join("a.yaml"), dir.join("b.yaml")])
            }
            other => panic!("expected an ambiguous config error, got {other:?}"),
        }
    }

    #[test]
    fn test_single_config_proceeds_to_data_loading() {
        let dir = model_dir("resolver-single", &["neg", "pos"], &["config.yaml"]);

        assert!(matches!(
            get_model_and_data(&dir),
            Err(ResolveError::Dataset(DatasetError::Csv(_)))
        ));
    }

    #[test]
    fn test_config_search_ignores_the_working_directory() {
        // Only the model directory is searched, whatever the process working directory holds
        let dir = model_dir("resolver-scoped", &["neg", "pos"], &["experiment.yaml"]);

        assert_eq!(find_config(&dir).unwrap(), dir.join("experiment.yaml"));
    }

    #[test]
    fn test_missing_target_names_is_an_io_error() {
        let dir = temp_dir("resolver-no-targets");

        assert!(matches!(
            get_model_and_data(&dir),
            Err(ResolveError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_target_names_is_a_json_error() {
        let dir = temp_dir("resolver-bad-targets");
        fs::write(dir.join(TARGET_NAMES_FILE), "{\"a\": 1}").unwrap();

        assert!(matches!(
            get_model_and_data(&dir),
            Err(ResolveError::Json(_))
        ));
    }
}
