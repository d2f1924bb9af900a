/// Text Classification Items
pub mod item;

/// Class name encoding
pub mod label_encoder;

/// TF-IDF text features
pub mod vectorizer;

/// The logistic regression model and its fitted weights
pub mod model;

/// The fitted pipeline and its persistence
pub mod pipeline;

/// Training
pub mod training;

pub use item::Item;
pub use label_encoder::{EncoderError, LabelEncoder};
pub use model::{ClassifierError, LinearClassifier, Model, ModelConfig};
pub use pipeline::{ArtifactError, Classifier, Pipeline};
pub use training::{run, train, Output, TrainingError};
pub use vectorizer::{TfidfVectorizer, VectorizerError};
