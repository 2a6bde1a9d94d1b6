use crate::errors::HStatError;

/// Format values to four decimals, comma separated.
pub fn fmt_vec_output(v: &[f64]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), HStatError> {
    validate_float_parameter(value, 0.0, f64::INFINITY, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), HStatError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(HStatError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_min_usize_parameter(value: usize, min: usize, parameter: &str) -> Result<(), HStatError> {
    if value < min {
        Err(HStatError::InvalidParameter(
            parameter.to_string(),
            format!("integer greater than or equal to {}", min),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Check sample weights against the number of rows of the data.
///
/// Weights must be finite, non-negative and must not all be zero,
/// otherwise the weighted averages are undefined.
pub fn validate_sample_weight(sample_weight: &[f64], rows: usize) -> Result<(), HStatError> {
    if sample_weight.len() != rows {
        return Err(HStatError::DimensionMismatch(
            "sample_weight".to_string(),
            rows,
            sample_weight.len(),
        ));
    }
    if let Some(w) = sample_weight.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(HStatError::InvalidParameter(
            "sample_weight".to_string(),
            "finite non-negative values".to_string(),
            w.to_string(),
        ));
    }
    let total: f64 = sample_weight.iter().sum();
    if total <= 0.0 {
        return Err(HStatError::InvalidParameter(
            "sample_weight".to_string(),
            "weights with a positive sum".to_string(),
            total.to_string(),
        ));
    }
    Ok(())
}

/// Weighted column means of a row major block.
///
/// * `values` - Row major values, `weights.len()` (or `values.len() / cols`) rows of `cols` entries.
/// * `cols` - Number of columns of the block.
/// * `weights` - Optional row weights, the plain mean is used without them.
pub fn weighted_column_means(values: &[f64], cols: usize, weights: Option<&[f64]>) -> Vec<f64> {
    let rows = values.len() / cols;
    let mut sums = vec![0.0; cols];
    match weights {
        Some(w) => {
            debug_assert_eq!(w.len(), rows);
            let total: f64 = w.iter().sum();
            for (row, wi) in values.chunks_exact(cols).zip(w) {
                for (s, v) in sums.iter_mut().zip(row) {
                    *s += wi * v;
                }
            }
            sums.iter_mut().for_each(|s| *s /= total);
        }
        None => {
            for row in values.chunks_exact(cols) {
                for (s, v) in sums.iter_mut().zip(row) {
                    *s += v;
                }
            }
            sums.iter_mut().for_each(|s| *s /= rows as f64);
        }
    }
    sums
}
