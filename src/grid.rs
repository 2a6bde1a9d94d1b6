//! Grid
//!
//! The points at which partial dependence is evaluated are the data's own
//! values of the selected features. Repeated value combinations only need to
//! be predicted once, so the grid is compressed to its distinct rows together
//! with a map back to every original row.
use crate::data::{Matrix, RowMajorMatrix};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// How the grid of a feature subset is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridStrategy {
    /// Distinct value combinations plus an inverse map.
    Deduplicate,
    /// Every row is its own grid point.
    Identity,
}

impl GridStrategy {
    /// Pick the strategy for the given columns.
    ///
    /// Columns taken from one dataset always share a length, so the
    /// `deduplicate` flag decides; a subset without columns has no distinct
    /// rows to extract and is evaluated row by row.
    pub fn select(columns: &[&[f64]], deduplicate: bool) -> Self {
        if deduplicate && !columns.is_empty() {
            GridStrategy::Deduplicate
        } else {
            GridStrategy::Identity
        }
    }
}

/// Bit pattern used for value equality, all NaN payloads are one missing value.
#[inline]
fn value_key(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// Grid points of a feature subset.
#[derive(Debug, Clone)]
pub struct Grid {
    /// One row per grid point, one column per selected feature.
    pub values: RowMajorMatrix<f64>,
    /// Grid row of every data row, `None` when the grid is the data itself.
    pub reconstruct: Option<Vec<usize>>,
}

impl Grid {
    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.values.rows
    }

    pub fn is_empty(&self) -> bool {
        self.values.rows == 0
    }

    /// Grid row holding the values of data row `row`.
    #[inline]
    pub fn grid_index(&self, row: usize) -> usize {
        match &self.reconstruct {
            Some(r) => r[row],
            None => row,
        }
    }
}

/// Build the grid of `features` over the rows of `data`.
///
/// * `data` - The data to take the grid values from.
/// * `features` - Column indices of the feature subset.
/// * `deduplicate` - Whether to compress repeated value combinations.
pub fn build_grid(data: &Matrix<f64>, features: &[usize], deduplicate: bool) -> Grid {
    let columns: Vec<&[f64]> = features.iter().map(|&f| data.get_col(f)).collect();
    match GridStrategy::select(&columns, deduplicate) {
        GridStrategy::Deduplicate => distinct_grid(&columns),
        GridStrategy::Identity => identity_grid(&columns),
    }
}

fn identity_grid(columns: &[&[f64]]) -> Grid {
    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut values = Vec::with_capacity(rows * columns.len());
    for i in 0..rows {
        values.extend(columns.iter().map(|c| c[i]));
    }
    Grid {
        values: RowMajorMatrix::new(values, rows, columns.len()),
        reconstruct: None,
    }
}

fn distinct_grid(columns: &[&[f64]]) -> Grid {
    let rows = columns[0].len();
    let k = columns.len();
    let mut seen: HashMap<Vec<u64>, usize> = HashMap::with_capacity(rows);
    let mut values = Vec::new();
    let mut reconstruct = Vec::with_capacity(rows);
    for i in 0..rows {
        let key: Vec<u64> = columns.iter().map(|c| value_key(c[i])).collect();
        let next = seen.len();
        let idx = *seen.entry(key).or_insert_with(|| {
            values.extend(columns.iter().map(|c| c[i]));
            next
        });
        reconstruct.push(idx);
    }
    let m = seen.len();
    if m == rows {
        // Nothing repeated, the inverse map is the identity.
        return Grid {
            values: RowMajorMatrix::new(values, m, k),
            reconstruct: None,
        };
    }
    Grid {
        values: RowMajorMatrix::new(values, m, k),
        reconstruct: Some(reconstruct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_select() {
        let a: &[f64] = &[1.0, 2.0];
        let b: &[f64] = &[3.0, 4.0];
        assert_eq!(GridStrategy::select(&[a, b], true), GridStrategy::Deduplicate);
        assert_eq!(GridStrategy::select(&[a, b], false), GridStrategy::Identity);
        assert_eq!(GridStrategy::select(&[], true), GridStrategy::Identity);
    }

    #[test]
    fn test_empty_subset() {
        let v = vec![1.0, 2.0, 3.0];
        let data = Matrix::new(&v, 3, 1);
        let grid = build_grid(&data, &[], true);
        assert!(grid.is_empty());
        assert_eq!(grid.values.cols, 0);
    }

    #[test]
    fn test_univariate_grid() {
        let v = vec![1.0, 2.0, 1.0, 3.0, 2.0, 9.0, 9.0, 9.0, 9.0, 9.0];
        let data = Matrix::new(&v, 5, 2);
        let grid = build_grid(&data, &[0], true);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.values.data, vec![1.0, 2.0, 3.0]);
        assert_eq!(grid.reconstruct, Some(vec![0, 1, 0, 2, 1]));
        for i in 0..data.rows {
            assert_eq!(grid.values.get(grid.grid_index(i), 0), data.get(i, 0));
        }

        let constant = build_grid(&data, &[1], true);
        assert_eq!(constant.len(), 1);
        assert_eq!(constant.reconstruct, Some(vec![0; 5]));
    }

    #[test]
    fn test_bivariate_grid() {
        // (0, 0), (0, 1), (0, 0), (1, 1)
        let v = vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let data = Matrix::new(&v, 4, 2);
        let grid = build_grid(&data, &[0, 1], true);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.values.row(grid.grid_index(2)), &[0.0, 0.0]);
        for i in 0..data.rows {
            assert_eq!(grid.values.row(grid.grid_index(i)), &[*data.get(i, 0), *data.get(i, 1)]);
        }
        // Column order of the subset is kept.
        let swapped = build_grid(&data, &[1, 0], true);
        assert_eq!(swapped.values.row(swapped.grid_index(1)), &[1.0, 0.0]);
    }

    #[test]
    fn test_distinct_rows_give_identity() {
        let v = vec![3.0, 1.0, 2.0];
        let data = Matrix::new(&v, 3, 1);
        let grid = build_grid(&data, &[0], true);
        assert_eq!(grid.len(), 3);
        assert!(grid.reconstruct.is_none());
    }

    #[test]
    fn test_identity_grid() {
        let v = vec![1.0, 1.0, 1.0];
        let data = Matrix::new(&v, 3, 1);
        let grid = build_grid(&data, &[0], false);
        assert_eq!(grid.len(), 3);
        assert!(grid.reconstruct.is_none());
        assert_eq!(grid.grid_index(2), 2);
    }

    #[test]
    fn test_missing_values_collapse() {
        let v = vec![f64::NAN, 1.0, -f64::NAN, 1.0];
        let data = Matrix::new(&v, 4, 1);
        let grid = build_grid(&data, &[0], true);
        assert_eq!(grid.len(), 2);
        assert!(grid.values.get(grid.grid_index(2), 0).is_nan());
    }
}
