//! Names and layout of a model artifact directory
//!
//! ```text
//! <artifacts_dir>/
//!   model.json          the fitted pipeline
//!   target_names.json   class names, in class id order
//!   config.yaml         the experiment config that produced the model
//! ```

use std::path::{Path, PathBuf};

/// Extension of the serialized pipeline
pub static ARTIFACT_EXTENSION: &str = "json";

/// File stem of the pipeline a model directory is expected to hold
pub static MODEL_NAME: &str = "model";

/// Class names file, a JSON array of strings
pub static TARGET_NAMES_FILE: &str = "target_names.json";

/// Extension of experiment config files
pub static CONFIG_EXTENSION: &str = "yaml";

/// The file name training writes the experiment config to
pub static CONFIG_FILE: &str = "config.yaml";

/// `<dir>/<model_name>.<ARTIFACT_EXTENSION>`
pub fn artifact_path(dir: impl AsRef<Path>, model_name: &str) -> PathBuf {
    dir.as_ref()
        .join(format!("{model_name}.{ARTIFACT_EXTENSION}"))
}

/// The pipeline file inside a model directory
pub fn model_path(dir: impl AsRef<Path>) -> PathBuf {
    artifact_path(dir, MODEL_NAME)
}
