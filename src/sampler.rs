//! Sampler
//!
//! Row subsampling of the reference data. The H-statistic is quadratic in the
//! number of rows, so large datasets are cut down to `n_max` rows, drawn
//! without replacement, before any partial dependence is evaluated.
use crate::data::Matrix;
use log::info;
use rand::rngs::StdRng;
use rand::seq::index;

/// Owned rows of the data (and weights) used for the computation.
#[derive(Debug, Clone)]
pub struct Subsample {
    /// Column major values.
    pub data: Vec<f64>,
    /// Number of rows kept.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Weights aligned with the kept rows.
    pub sample_weight: Option<Vec<f64>>,
    /// Rows of the original data that were kept, `None` if all rows were kept.
    pub row_indices: Option<Vec<usize>>,
}

impl Subsample {
    /// View the kept rows as a matrix.
    pub fn matrix(&self) -> Matrix<'_, f64> {
        Matrix::new(&self.data, self.rows, self.cols)
    }

    pub fn sample_weight(&self) -> Option<&[f64]> {
        self.sample_weight.as_deref()
    }
}

pub struct Subsampler {
    n_max: usize,
}

impl Subsampler {
    pub fn new(n_max: usize) -> Self {
        Subsampler { n_max }
    }

    /// Draw `n_max` of `n` row indices without replacement, sorted ascending.
    /// Returns `None` when all rows fit.
    pub fn sample_rows(&self, rng: &mut StdRng, n: usize) -> Option<Vec<usize>> {
        if n <= self.n_max {
            return None;
        }
        let mut rows = index::sample(rng, n, self.n_max).into_vec();
        rows.sort_unstable();
        Some(rows)
    }

    /// Subsample the data and weights, copying them when no sampling is needed.
    pub fn subsample(&self, rng: &mut StdRng, data: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Subsample {
        match self.sample_rows(rng, data.rows) {
            Some(rows) => {
                info!("Subsampling {} of {} rows.", rows.len(), data.rows);
                Subsample {
                    data: data.take_rows(&rows),
                    rows: rows.len(),
                    cols: data.cols,
                    sample_weight: sample_weight.map(|w| rows.iter().map(|&i| w[i]).collect()),
                    row_indices: Some(rows),
                }
            }
            None => Subsample {
                data: data.data.to_vec(),
                rows: data.rows,
                cols: data.cols,
                sample_weight: sample_weight.map(|w| w.to_vec()),
                row_indices: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_sample_rows() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = Subsampler::new(5);
        let rows = sampler.sample_rows(&mut rng, 20).unwrap();
        assert_eq!(rows.len(), 5);
        // Sorted and without replacement.
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert!(rows.iter().all(|&r| r < 20));

        // All rows fit, nothing to sample.
        assert!(sampler.sample_rows(&mut rng, 5).is_none());
        assert!(sampler.sample_rows(&mut rng, 0).is_none());
    }

    #[test]
    fn test_sample_rows_seeded() {
        let sampler = Subsampler::new(10);
        let a = sampler.sample_rows(&mut StdRng::seed_from_u64(7), 100);
        let b = sampler.sample_rows(&mut StdRng::seed_from_u64(7), 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_subsample_passthrough() {
        let mut rng = StdRng::seed_from_u64(0);
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let w = vec![0.5, 1.0, 2.0];
        let data = Matrix::new(&v, 3, 2);
        let s = Subsampler::new(3).subsample(&mut rng, &data, Some(&w));
        assert_eq!(s.data, v);
        assert_eq!(s.sample_weight(), Some(w.as_slice()));
        assert!(s.row_indices.is_none());
        assert_eq!(s.matrix().get(2, 1), &6.0);
    }

    #[test]
    fn test_subsample_rows_and_weights_aligned() {
        let mut rng = StdRng::seed_from_u64(3);
        // Column 0 holds the row number, column 1 ten times the row number.
        let n = 50;
        let mut v: Vec<f64> = (0..n).map(|i| i as f64).collect();
        v.extend((0..n).map(|i| 10.0 * i as f64));
        let w: Vec<f64> = (0..n).map(|i| i as f64 + 100.0).collect();
        let data = Matrix::new(&v, n, 2);
        let s = Subsampler::new(8).subsample(&mut rng, &data, Some(&w));
        assert_eq!(s.rows, 8);
        let m = s.matrix();
        let weights = s.sample_weight().unwrap();
        for (k, &row) in s.row_indices.as_ref().unwrap().iter().enumerate() {
            assert_eq!(*m.get(k, 0), row as f64);
            assert_eq!(*m.get(k, 1), 10.0 * row as f64);
            assert_eq!(weights[k], row as f64 + 100.0);
        }
    }
}
