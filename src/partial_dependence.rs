//! Partial Dependence
//!
//! Brute force partial dependence by simulated intervention: the data is
//! replicated once per grid point with the selected features overwritten by
//! that point, the whole stack is predicted in one call, and each block of
//! predictions is averaged.
use crate::config::HStatConfig;
use crate::data::{Matrix, RowMajorMatrix};
use crate::errors::HStatError;
use crate::estimator::Predictor;
use crate::grid::{build_grid, Grid};
use crate::utils::weighted_column_means;
use log::{debug, warn};
use std::ops::Range;

/// Replicate `data` once per grid row in `blocks`, column major.
///
/// Block `b` is the full data with the `features` columns set to grid row `b`.
fn stack_blocks(data: &Matrix<f64>, features: &[usize], grid: &Grid, blocks: Range<usize>) -> Vec<f64> {
    let n = data.rows;
    let mut table = Vec::with_capacity(n * blocks.len() * data.cols);
    for j in 0..data.cols {
        match features.iter().position(|&f| f == j) {
            Some(pos) => {
                for b in blocks.clone() {
                    let v = *grid.values.get(b, pos);
                    table.extend(std::iter::repeat(v).take(n));
                }
            }
            None => {
                let col = data.get_col(j);
                for _ in blocks.clone() {
                    table.extend_from_slice(col);
                }
            }
        }
    }
    table
}

/// Grid blocks that fit into one evaluation table.
fn blocks_per_batch(rows: usize, cols: usize, n_blocks: usize, max_evaluation_cells: usize) -> usize {
    let block_cells = (rows * cols).max(1);
    (max_evaluation_cells / block_cells).clamp(1, n_blocks.max(1))
}

/// Partial dependence at every grid point, not centered.
///
/// Returns one row per grid point and one column per model output.
///
/// * `predictor` - Prediction capability of the model.
/// * `data` - The data the other features vary over.
/// * `features` - Column indices of the feature subset.
/// * `grid` - Values of `features` to evaluate at.
/// * `sample_weight` - Optional weights of the rows of `data`.
/// * `max_evaluation_cells` - Upper bound on rows times columns of one prediction call.
pub fn calculate_pd_stacked(
    predictor: &Predictor,
    data: &Matrix<f64>,
    features: &[usize],
    grid: &Grid,
    sample_weight: Option<&[f64]>,
    max_evaluation_cells: usize,
) -> Result<RowMajorMatrix<f64>, HStatError> {
    let n = data.rows;
    let n_grid = grid.len();
    let batch = blocks_per_batch(n, data.cols, n_grid, max_evaluation_cells);
    if batch < n_grid {
        warn!(
            "Evaluation table of {} rows exceeds the cell limit, predicting in batches of {} grid points.",
            n * n_grid,
            batch
        );
    }

    let mut pd: Option<RowMajorMatrix<f64>> = None;
    let mut start = 0;
    while start < n_grid {
        let end = (start + batch).min(n_grid);
        let table = stack_blocks(data, features, grid, start..end);
        let stacked = Matrix::new(&table, n * (end - start), data.cols);
        let preds = predictor.predict(&stacked)?;
        let output_dim = preds.cols;

        let pd = pd.get_or_insert_with(|| RowMajorMatrix::new(Vec::with_capacity(n_grid * output_dim), 0, output_dim));
        if pd.cols != output_dim {
            return Err(HStatError::DimensionMismatch(
                "prediction outputs".to_string(),
                pd.cols,
                output_dim,
            ));
        }
        // Partial dependences are averages per grid block.
        for block in preds.data.chunks_exact(n * output_dim) {
            pd.append_row(weighted_column_means(block, output_dim, sample_weight));
        }
        start = end;
    }
    Ok(pd.unwrap_or_else(|| RowMajorMatrix::new(Vec::new(), 0, 1)))
}

/// Expand grid level partial dependence to the data rows and center it.
///
/// The weighted mean of every output column of the result is zero.
pub fn center_pd(pd: &RowMajorMatrix<f64>, grid: &Grid, rows: usize, sample_weight: Option<&[f64]>) -> RowMajorMatrix<f64> {
    let mut values = Vec::with_capacity(rows * pd.cols);
    for i in 0..rows {
        values.extend_from_slice(pd.row(grid.grid_index(i)));
    }
    let means = weighted_column_means(&values, pd.cols, sample_weight);
    for row in values.chunks_exact_mut(pd.cols) {
        for (v, m) in row.iter_mut().zip(&means) {
            *v -= m;
        }
    }
    RowMajorMatrix::new(values, rows, pd.cols)
}

/// Centered partial dependence of a feature subset over the data distribution.
///
/// Returns one row per row of `data` and one column per model output.
pub fn partial_dependence_over_data(
    predictor: &Predictor,
    data: &Matrix<f64>,
    features: &[usize],
    sample_weight: Option<&[f64]>,
    config: &HStatConfig,
) -> Result<RowMajorMatrix<f64>, HStatError> {
    let grid = build_grid(data, features, config.deduplicate_grid);
    debug!(
        "Partial dependence of features {:?} on {} grid points for {} rows.",
        features,
        grid.len(),
        data.rows
    );
    let pd = calculate_pd_stacked(
        predictor,
        data,
        features,
        &grid,
        sample_weight,
        config.max_evaluation_cells,
    )?;
    Ok(center_pd(&pd, &grid, data.rows, sample_weight))
}
