//! Errors
//!
//! Custom error types used throughout the `hstat` crate.
use thiserror::Error;

/// Errors that can occur while computing interaction statistics.
#[derive(Debug, Error)]
pub enum HStatError {
    /// The estimator has not been fitted.
    #[error("The estimator is not fitted yet. Call fit before computing interaction statistics.")]
    UnfittedModel,
    /// The estimator is neither a regressor nor a classifier, or lacks the prediction method its kind requires.
    #[error("Unsupported estimator: {0}")]
    UnsupportedModelKind(String),
    /// Classifiers with array-valued class labels per row.
    #[error("Multiclass-multioutput estimators are not supported.")]
    UnsupportedTargetShape,
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Feature name or index that cannot be resolved against the data.
    #[error("Feature {0} could not be found in the data.")]
    UnknownFeature(String),
    /// First value is what was checked, second is expected length, third is actual length.
    #[error("Dimension mismatch for {0}: expected {1}, got {2}.")]
    DimensionMismatch(String, usize, usize),
    /// The estimator returned a prediction matrix with the wrong number of rows.
    #[error("Estimator returned {1} prediction rows for {0} input rows.")]
    PredictionShape(usize, usize),
    /// Unable to write configuration or results.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read configuration or results.
    #[error("Unable to read from a file {0}")]
    UnableToRead(String),
}
