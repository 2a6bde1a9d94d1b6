//! Interaction
//!
//! Friedman and Popescu's H-statistic of pairwise interaction strength.
//!
//! For a feature pair `j, k` the statistic is
//!
//! ```text
//! H_jk^2 = Numerator_jk / Denominator_jk, where
//!   Numerator_jk   = sum_i w_i (PD_jk(x_ij, x_ik) - PD_j(x_ij) - PD_k(x_ik))^2 / sum_i w_i
//!   Denominator_jk = sum_i w_i PD_jk(x_ij, x_ik)^2 / sum_i w_i
//! ```
//!
//! with `PD_j` and `PD_jk` the one- and two-dimensional partial dependence
//! functions centered to weighted mean 0, evaluated at the data rows. It is
//! the share of the joint effect variability of two features that their main
//! effects do not explain; without interaction it is exactly 0. The numerator
//! (or its square root) is an absolute measure of interaction strength.
//!
//! The cost is `O(p^2 n^2)` predictions for `p` features and `n` rows. `n` is
//! capped by `n_max`, selecting a handful of important features is up to the
//! caller: for weak features the denominator is small and even a weak
//! interaction can give a large H-squared, sometimes above 1.
//!
//! Reference: J. H. Friedman and B. E. Popescu, "Predictive Learning via Rule
//! Ensembles", The Annals of Applied Statistics, 2(3), 916-954, 2008.
use crate::config::{Feature, HStatConfig, HStatIO};
use crate::data::{Matrix, RowMajorMatrix};
use crate::errors::HStatError;
use crate::estimator::{Estimator, Predictor};
use crate::partial_dependence::partial_dependence_over_data;
use crate::sampler::Subsampler;
use crate::utils::{fmt_vec_output, validate_sample_weight, weighted_column_means};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pairwise interaction statistics.
///
/// Row `i` of every matrix belongs to `feature_pairs[i]`; there is one column
/// per model output (a single column for regressors and binary classifiers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HStatistic {
    /// Feature pairs, as identified by the caller.
    pub feature_pairs: Vec<(Feature, Feature)>,
    /// Pairwise H-squared, the numerator divided by the denominator.
    pub h_squared_pairwise: RowMajorMatrix<f64>,
    /// Numerator of the pairwise H-squared, the absolute interaction strength.
    pub numerator_pairwise: RowMajorMatrix<f64>,
    /// Denominator of the pairwise H-squared, the joint effect variability.
    pub denominator_pairwise: RowMajorMatrix<f64>,
}

impl HStatistic {
    /// Number of feature pairs.
    pub fn n_pairs(&self) -> usize {
        self.feature_pairs.len()
    }

    /// Number of model outputs per pair.
    pub fn output_dim(&self) -> usize {
        self.h_squared_pairwise.cols
    }

    /// Position of the pair `a, b` in either order.
    pub fn pair_index(&self, a: &Feature, b: &Feature) -> Option<usize> {
        self.feature_pairs
            .iter()
            .position(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    pub fn h_squared(&self, pair: usize) -> &[f64] {
        self.h_squared_pairwise.row(pair)
    }

    pub fn numerator(&self, pair: usize) -> &[f64] {
        self.numerator_pairwise.row(pair)
    }

    pub fn denominator(&self, pair: usize) -> &[f64] {
        self.denominator_pairwise.row(pair)
    }
}

impl HStatIO for HStatistic {}

impl fmt::Display for HStatistic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (a, b)) in self.feature_pairs.iter().enumerate() {
            writeln!(
                f,
                "({}, {}): h_squared [{}], numerator [{}], denominator [{}]",
                a,
                b,
                fmt_vec_output(self.h_squared(i)),
                fmt_vec_output(self.numerator(i)),
                fmt_vec_output(self.denominator(i)),
            )?;
        }
        Ok(())
    }
}

/// All unordered pairs of `0..p`, in lexicographic order.
fn combinations(p: usize) -> Vec<(usize, usize)> {
    (0..p).flat_map(|j| ((j + 1)..p).map(move |k| (j, k))).collect()
}

/// Numerator and denominator of one feature pair.
fn pair_statistic(
    bivariate: &RowMajorMatrix<f64>,
    pd_j: &RowMajorMatrix<f64>,
    pd_k: &RowMajorMatrix<f64>,
    sample_weight: Option<&[f64]>,
) -> (Vec<f64>, Vec<f64>) {
    let residual_sq: Vec<f64> = bivariate
        .data
        .iter()
        .zip(&pd_j.data)
        .zip(&pd_k.data)
        .map(|((jk, j), k)| (jk - j - k).powi(2))
        .collect();
    let bivariate_sq: Vec<f64> = bivariate.data.iter().map(|v| v * v).collect();
    (
        weighted_column_means(&residual_sq, bivariate.cols, sample_weight),
        weighted_column_means(&bivariate_sq, bivariate.cols, sample_weight),
    )
}

/// Run `f` over `items`, in parallel on the current rayon pool when `parallel` is set.
fn map_items<T, R, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<R>, HStatError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R, HStatError> + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Friedman and Popescu's H-statistic of pairwise interaction strength.
///
/// Calculates the H-squared statistic, its numerator and its denominator for
/// every pair of the requested features.
///
/// * `estimator` - A fitted regressor or classifier.
/// * `data` - Data the estimator can predict, one column per feature.
/// * `features` - Features to pair up, by index or name. Defaults to all columns.
/// * `sample_weight` - Optional row weights used in the partial dependences.
/// * `config` - Subsampling, threshold and evaluation settings.
pub fn h_statistic<E: Estimator + ?Sized>(
    estimator: &E,
    data: &Matrix<f64>,
    features: Option<&[Feature]>,
    sample_weight: Option<&[f64]>,
    config: &HStatConfig,
) -> Result<HStatistic, HStatError> {
    let predictor = Predictor::from_estimator(estimator)?;
    config.validate()?;
    if data.rows == 0 {
        return Err(HStatError::InvalidParameter(
            "data".to_string(),
            "at least one row".to_string(),
            "0 rows".to_string(),
        ));
    }
    if let Some(w) = sample_weight {
        validate_sample_weight(w, data.rows)?;
    }
    let feature_names = config.feature_names.as_deref();
    if let Some(names) = feature_names {
        if names.len() != data.cols {
            return Err(HStatError::DimensionMismatch(
                "feature_names".to_string(),
                data.cols,
                names.len(),
            ));
        }
    }

    let features: Vec<Feature> = match features {
        Some(f) => f.to_vec(),
        None => (0..data.cols).map(Feature::Index).collect(),
    };
    let feature_indices = features
        .iter()
        .map(|f| f.resolve(feature_names, data.cols))
        .collect::<Result<Vec<usize>, HStatError>>()?;

    // Usually, the data is too large and we need subsampling
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sample = Subsampler::new(config.n_max).subsample(&mut rng, data, sample_weight);
    let x = sample.matrix();
    let w = sample.sample_weight();
    if let Some(w) = w {
        // The kept rows may carry no weight at all.
        validate_sample_weight(w, x.rows)?;
    }

    let pairs = combinations(feature_indices.len());
    info!(
        "Calculating H-statistic for {} features and {} pairs on {} rows.",
        feature_indices.len(),
        pairs.len(),
        x.rows
    );

    type Evaluated = (Vec<RowMajorMatrix<f64>>, Vec<(Vec<f64>, Vec<f64>)>);
    let evaluate = || -> Result<Evaluated, HStatError> {
        let pd_univariate = map_items(&feature_indices, config.parallel, |&idx| {
            partial_dependence_over_data(&predictor, &x, &[idx], w, config)
        })?;
        let stats = map_items(&pairs, config.parallel, |&(j, k)| {
            let pd_bivariate =
                partial_dependence_over_data(&predictor, &x, &[feature_indices[j], feature_indices[k]], w, config)?;
            Ok(pair_statistic(&pd_bivariate, &pd_univariate[j], &pd_univariate[k], w))
        })?;
        Ok((pd_univariate, stats))
    };
    let (pd_univariate, stats) = if config.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| {
                HStatError::InvalidParameter("num_threads".to_string(), "a buildable thread pool".to_string(), e.to_string())
            })?;
        pool.install(evaluate)?
    } else {
        evaluate()?
    };

    let output_dim = pd_univariate.first().map(|pd| pd.cols).unwrap_or(1);
    let n_pairs = pairs.len();
    let mut numerator = RowMajorMatrix::filled(0.0, n_pairs, output_dim);
    let mut denominator = RowMajorMatrix::filled(0.0, n_pairs, output_dim);
    let mut h_squared = RowMajorMatrix::filled(0.0, n_pairs, output_dim);
    for (i, (num, denom)) in stats.into_iter().enumerate() {
        for d in 0..output_dim {
            // Round small numerators to 0
            let num_d = if num[d].abs() < config.eps { 0.0 } else { num[d] };
            numerator.row_mut(i)[d] = num_d;
            denominator.row_mut(i)[d] = denom[d];
            h_squared.row_mut(i)[d] = if denom[d] > 0.0 { num_d / denom[d] } else { 0.0 };
        }
    }

    Ok(HStatistic {
        feature_pairs: pairs
            .iter()
            .map(|&(j, k)| (features[j].clone(), features[k].clone()))
            .collect(),
        h_squared_pairwise: h_squared,
        numerator_pairwise: numerator,
        denominator_pairwise: denominator,
    })
}
