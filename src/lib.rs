// Modules
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod estimator;
pub mod grid;
pub mod interaction;
pub mod partial_dependence;
pub mod sampler;
pub mod utils;

// Individual classes, and functions
pub use config::{Feature, HStatConfig, HStatIO};
pub use data::{Matrix, RowMajorMatrix};
pub use errors::HStatError;
pub use estimator::{Classifier, Estimator, FnClassifier, FnRegressor, Predictor, Regressor};
pub use interaction::{h_statistic, HStatistic};
