/// TF-IDF and logistic regression text classification
pub mod text_classification;
