use burn::{
    module::{AutodiffModule, Module},
    nn::{loss::CrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    optim::{AdamWConfig, GradientsParams, Optimizer},
    tensor::{
        activation::softmax,
        backend::{AutodiffBackend, Backend},
        Data, ElementConversion, Int, Shape, Tensor,
    },
};
use serde::{Deserialize, Serialize};

use crate::config::LogRegConfig;

/// Multinomial logistic regression as a single linear layer over TF-IDF features
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Maps features to class logits
    linear: Linear<B>,
}

impl<B: Backend> Model<B> {
    /// Class logits for a `[batch_size, n_features]` input
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }
}

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct ModelConfig {
    /// Number of input features
    pub n_features: usize,

    /// Number of output classes
    pub n_classes: usize,
}

impl ModelConfig {
    /// Initialize a zero-weight model
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let linear = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);

        Model { linear }
    }
}

/// Fit a logistic regression with full-batch AdamW on the cross-entropy loss
pub fn fit<B: AutodiffBackend>(
    features: Tensor<B, 2>,     // TF-IDF features: [n_samples, n_features]
    targets: Tensor<B, 1, Int>, // Class ids: [n_samples]
    n_classes: usize,
    config: &LogRegConfig,
    device: &B::Device,
) -> LinearClassifier {
    let [n_samples, n_features] = features.dims();

    let mut model = ModelConfig::new(n_features, n_classes).init::<B>(device);
    let mut optimizer = AdamWConfig::new()
        .with_weight_decay(config.weight_decay)
        .init();
    let criterion = CrossEntropyLossConfig::new().init::<B>(device);

    log::info!(
        "Fitting logistic regression on {} samples, {} features, {} classes",
        n_samples,
        n_features,
        n_classes
    );

    for epoch in 1..=config.num_epochs {
        let loss = criterion.forward(model.forward(features.clone()), targets.clone());

        if epoch == 1 || epoch % 50 == 0 || epoch == config.num_epochs {
            log::debug!(
                "Epoch {}/{} - loss {:.6}",
                epoch,
                config.num_epochs,
                loss.clone().into_scalar().elem::<f32>()
            );
        }

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optimizer.step(config.learning_rate, model, grads);
    }

    LinearClassifier::from_model(&model.valid())
}

/// The learned weights of a fitted logistic regression, independent of any backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    n_features: usize,
    n_classes: usize,

    /// Row-major `[n_features, n_classes]`
    weights: Vec<f32>,

    /// One intercept per class
    bias: Vec<f32>,
}

impl LinearClassifier {
    /// Build a classifier from explicit weights
    pub fn new(
        n_features: usize,
        n_classes: usize,
        weights: Vec<f32>,
        bias: Vec<f32>,
    ) -> Result<Self, ClassifierError> {
        let classifier = Self {
            n_features,
            n_classes,
            weights,
            bias,
        };
        classifier.validate()?;

        Ok(classifier)
    }

    /// Extract the weights of a trained model
    pub fn from_model<B: Backend>(model: &Model<B>) -> Self {
        let weight = model.linear.weight.val();
        let [n_features, n_classes] = weight.dims();

        let weights = weight.into_data().convert::<f32>().value;
        let bias = match &model.linear.bias {
            Some(bias) => bias.val().into_data().convert::<f32>().value,
            None => vec![0.0; n_classes],
        };

        Self {
            n_features,
            n_classes,
            weights,
            bias,
        }
    }

    /// Class logits: `features · weights + bias`
    pub fn decision_function<B: Backend>(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = features.device();

        let weights = Tensor::<B, 2>::from_floats(
            Data::new(
                self.weights.clone(),
                Shape::new([self.n_features, self.n_classes]),
            ),
            &device,
        );
        let bias = Tensor::<B, 1>::from_floats(
            Data::new(self.bias.clone(), Shape::new([self.n_classes])),
            &device,
        );

        features.matmul(weights) + bias.unsqueeze()
    }

    /// Class membership probabilities, each row summing to one
    pub fn predict_proba<B: Backend>(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.decision_function(features), 1)
    }

    /// Number of input features
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of output classes
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Check that the weight buffers match the declared shape
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.n_classes == 0 {
            return Err(ClassifierError::NoClasses);
        }

        let expected = self.n_features.checked_mul(self.n_classes);
        if expected != Some(self.weights.len()) || self.bias.len() != self.n_classes
        {
            return Err(ClassifierError::ShapeMismatch {
                n_features: self.n_features,
                n_classes: self.n_classes,
                weights: self.weights.len(),
                bias: self.bias.len(),
            });
        }

        Ok(())
    }
}

/// Classifier Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ClassifierError {
    /// A classifier needs at least one output class
    #[error("the classifier has no classes")]
    NoClasses,

    /// The weight buffers don't match the declared shape
    #[error(
        "expected {n_features}x{n_classes} weights and {n_classes} biases, \
         found {weights} weights and {bias} biases"
    )]
    ShapeMismatch {
        /// Declared number of features
        n_features: usize,
        /// Declared number of classes
        n_classes: usize,
        /// Length of the weight buffer
        weights: usize,
        /// Length of the bias buffer
        bias: usize,
    },
}
