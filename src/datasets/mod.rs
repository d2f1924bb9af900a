use std::path::PathBuf;

/// Labeled text read from delimited files
pub mod labeled;

pub use labeled::{load_data, Dataset, Example, Split};

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The file is missing or is not valid delimited text
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A required column is not present in the header row
    #[error("column {column:?} not found in {}", path.display())]
    MissingColumn {
        /// The column that was looked up
        column: String,

        /// The file that was read
        path: PathBuf,
    },

    /// The configured separator is not a single byte
    #[error("separator must be a single byte, got {0:?}")]
    InvalidDelimiter(String),
}
