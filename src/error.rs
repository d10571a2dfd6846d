use thiserror::Error;

/// Error types for the lloyd-kmeans library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KMeansError {
    /// A parameter is out of range (cluster count, iteration budget)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input has the wrong rank, or its dimensions don't match the model
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call fit() first.")]
    NotFitted,
}
