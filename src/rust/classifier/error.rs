use std::io;

/// Represents the different types of errors that can occur while training or using the classifier.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    /// The dataset file exists but could not be read
    #[error("Dataset IO error: {0}")]
    DatasetIo(#[from] io::Error),
    /// The dataset file is not valid CSV or lacks the expected columns
    #[error("Malformed dataset: {0}")]
    MalformedDataset(#[from] csv::Error),
    /// The dataset contained no rows
    #[error("Dataset is empty")]
    EmptyDataset,
    /// No category labels were available to fit on
    #[error("No categories to train on")]
    NoCategories,
    /// Not enough rows to produce both a train and a test partition
    #[error("Cannot split {rows} rows with test size {test_size}: one partition would be empty")]
    InsufficientRows { rows: usize, test_size: f64 },
    /// Input shapes do not line up
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    /// The vectorizer or classifier was used before being fitted
    #[error("{0} has not been fitted")]
    NotFitted(&'static str),
    /// Invalid configuration or input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
}
