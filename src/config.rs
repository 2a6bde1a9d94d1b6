//! Configuration
//!
//! Parameters of the H-statistic computation and the identifiers callers use
//! to select features.
use crate::constants::{DEFAULT_EPS, DEFAULT_N_MAX, MAX_EVALUATION_CELLS};
use crate::errors::HStatError;
use crate::utils::{validate_min_usize_parameter, validate_positive_float_parameter};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// A feature as identified by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Column index into the data.
    Index(usize),
    /// Column name, resolved against the feature names.
    Name(String),
}

impl Feature {
    /// Column index of the feature.
    ///
    /// * `feature_names` - Names of the data columns, required to resolve names.
    /// * `cols` - Number of columns of the data.
    pub fn resolve(&self, feature_names: Option<&[String]>, cols: usize) -> Result<usize, HStatError> {
        match self {
            Feature::Index(i) if *i < cols => Ok(*i),
            Feature::Index(_) => Err(HStatError::UnknownFeature(self.to_string())),
            Feature::Name(name) => feature_names
                .and_then(|names| names.iter().position(|n| n == name))
                .filter(|i| *i < cols)
                .ok_or_else(|| HStatError::UnknownFeature(self.to_string())),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Feature::Index(i) => write!(f, "{}", i),
            Feature::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for Feature {
    fn from(i: usize) -> Self {
        Feature::Index(i)
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Feature::Name(name.to_string())
    }
}

impl From<String> for Feature {
    fn from(name: String) -> Self {
        Feature::Name(name)
    }
}

fn default_n_max() -> usize {
    DEFAULT_N_MAX
}
fn default_eps() -> f64 {
    DEFAULT_EPS
}
fn default_deduplicate_grid() -> bool {
    true
}
fn default_max_evaluation_cells() -> usize {
    MAX_EVALUATION_CELLS
}

/// Configuration for `h_statistic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HStatConfig {
    /// Number of rows to draw without replacement from the data (and weights).
    #[serde(default = "default_n_max")]
    pub n_max: usize,
    /// Seed of the subsampling generator, entropy seeded if `None`.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Threshold below which numerator values are set to 0.
    #[serde(default = "default_eps")]
    pub eps: f64,
    /// Whether repeated grid points are predicted once.
    #[serde(default = "default_deduplicate_grid")]
    pub deduplicate_grid: bool,
    /// Evaluate feature pairs in parallel.
    #[serde(default)]
    pub parallel: bool,
    /// Number of threads for parallel evaluation.
    #[serde(default)]
    pub num_threads: Option<usize>,
    /// Upper bound on rows times columns of one stacked prediction call.
    #[serde(default = "default_max_evaluation_cells")]
    pub max_evaluation_cells: usize,
    /// Names of the data columns, used to resolve `Feature::Name`.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl Default for HStatConfig {
    fn default() -> Self {
        HStatConfig {
            n_max: DEFAULT_N_MAX,
            seed: None,
            eps: DEFAULT_EPS,
            deduplicate_grid: true,
            parallel: false,
            num_threads: None,
            max_evaluation_cells: MAX_EVALUATION_CELLS,
            feature_names: None,
        }
    }
}

impl HStatConfig {
    // Set methods for parameters

    /// Set the row cap.
    /// * `n_max` - Rows are subsampled without replacement down to this number.
    pub fn set_n_max(mut self, n_max: usize) -> Self {
        self.n_max = n_max;
        self
    }

    /// Set the subsampling seed.
    pub fn set_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the numerator threshold.
    /// * `eps` - Numerators with absolute value below it are reported as 0.
    pub fn set_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn set_deduplicate_grid(mut self, deduplicate_grid: bool) -> Self {
        self.deduplicate_grid = deduplicate_grid;
        self
    }

    /// Set parallel evaluation of feature pairs.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of threads.
    /// * `num_threads` - Threads of the pool used when `parallel` is set.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn set_max_evaluation_cells(mut self, max_evaluation_cells: usize) -> Self {
        self.max_evaluation_cells = max_evaluation_cells;
        self
    }

    /// Set the column names.
    pub fn set_feature_names(mut self, feature_names: Option<Vec<String>>) -> Self {
        self.feature_names = feature_names;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), HStatError> {
        validate_min_usize_parameter(self.n_max, 1, "n_max")?;
        validate_positive_float_parameter(self.eps, "eps")?;
        validate_min_usize_parameter(self.max_evaluation_cells, 1, "max_evaluation_cells")?;
        if let Some(n) = self.num_threads {
            validate_min_usize_parameter(n, 1, "num_threads")?;
        }
        Ok(())
    }
}

/// IO
pub trait HStatIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), HStatError> {
        fs::write(path, self.json_dump()?).map_err(|e| HStatError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, HStatError> {
        serde_json::to_string(self).map_err(|e| HStatError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, HStatError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| HStatError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, HStatError> {
        let json_str = fs::read_to_string(path).map_err(|e| HStatError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl HStatIO for HStatConfig {}
