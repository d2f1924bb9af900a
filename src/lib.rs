//! # text-clf
//!
//! A TF-IDF and logistic regression text classification baseline. The training flow fits and
//! persists a pipeline, and the diagnostics flow reloads a saved binary model to recompute its
//! precision-recall and ROC curves on the held-out split.
#![forbid(unsafe_code)]

/// Model artifact directory layout
pub mod artifacts;

/// Experiment configuration
pub mod config;

/// Datasets
pub mod datasets;

/// Curves for saved binary classifiers
pub mod diagnostics;

/// Evaluation metrics
pub mod metrics;

/// Pipelines
pub mod pipelines;

/// Utilities
pub mod utils;
