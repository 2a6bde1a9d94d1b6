//! Estimator
//!
//! The fitted model is an opaque capability. An [`Estimator`] advertises
//! whether it is a [`Regressor`] (point predictions) or a [`Classifier`]
//! (per-class probabilities); the capability is resolved once into a
//! [`Predictor`] before any computation starts.
use crate::data::{Matrix, RowMajorMatrix};
use crate::errors::HStatError;

/// A fitted model producing point predictions.
pub trait Regressor: Sync {
    /// Predict every row of `data`.
    ///
    /// Returns one row per input row and one column per model output.
    fn predict(&self, data: &Matrix<f64>) -> RowMajorMatrix<f64>;
}

/// A fitted model producing class probabilities.
pub trait Classifier: Sync {
    /// Class probabilities, one row per input row and one column per class.
    fn predict_proba(&self, data: &Matrix<f64>) -> RowMajorMatrix<f64>;

    /// Whether each row is labelled by an array of classes.
    fn is_multiclass_multioutput(&self) -> bool {
        false
    }
}

/// A model the interaction statistics can be computed for.
pub trait Estimator: Sync {
    /// Whether the model holds fitted state.
    fn is_fitted(&self) -> bool {
        true
    }

    fn as_regressor(&self) -> Option<&dyn Regressor> {
        None
    }

    fn as_classifier(&self) -> Option<&dyn Classifier> {
        None
    }
}

/// Prediction capability of an estimator, resolved once.
#[derive(Clone, Copy)]
pub enum Predictor<'a> {
    Regression(&'a dyn Regressor),
    Classification(&'a dyn Classifier),
}

impl<'a> Predictor<'a> {
    /// Check the estimator and pick its prediction capability.
    pub fn from_estimator<E: Estimator + ?Sized>(estimator: &'a E) -> Result<Self, HStatError> {
        if !estimator.is_fitted() {
            return Err(HStatError::UnfittedModel);
        }
        match (estimator.as_regressor(), estimator.as_classifier()) {
            (Some(r), None) => Ok(Predictor::Regression(r)),
            (None, Some(c)) => {
                if c.is_multiclass_multioutput() {
                    Err(HStatError::UnsupportedTargetShape)
                } else {
                    Ok(Predictor::Classification(c))
                }
            }
            (None, None) => Err(HStatError::UnsupportedModelKind(
                "the estimator must be a fitted regressor or classifier".to_string(),
            )),
            (Some(_), Some(_)) => Err(HStatError::UnsupportedModelKind(
                "the estimator must be either a regressor or a classifier, not both".to_string(),
            )),
        }
    }

    /// The prediction signal partial dependence is averaged over.
    ///
    /// For binary classifiers only the probability of the positive (second)
    /// class is kept.
    pub fn predict(&self, data: &Matrix<f64>) -> Result<RowMajorMatrix<f64>, HStatError> {
        let preds = match self {
            Predictor::Regression(r) => r.predict(data),
            Predictor::Classification(c) => c.predict_proba(data),
        };
        if preds.rows != data.rows || preds.cols == 0 || preds.data.len() != preds.rows * preds.cols {
            return Err(HStatError::PredictionShape(data.rows, preds.rows));
        }
        match self {
            Predictor::Classification(_) if preds.cols == 2 => {
                let positive = preds.data.chunks_exact(2).map(|p| p[1]).collect();
                Ok(RowMajorMatrix::new(positive, preds.rows, 1))
            }
            _ => Ok(preds),
        }
    }
}

/// Row major matrix from a flat prediction buffer.
///
/// A trailing partial row counts as a row, the length is checked in
/// [`Predictor::predict`].
fn from_flat(data: Vec<f64>, cols: usize) -> RowMajorMatrix<f64> {
    let rows = data.len().div_ceil(cols);
    RowMajorMatrix { data, rows, cols }
}

/// Regressor backed by a prediction function.
///
/// The function receives the data and returns row major predictions,
/// `n_outputs` values per row.
pub struct FnRegressor<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    predict_fn: F,
    n_outputs: usize,
}

impl<F> FnRegressor<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    /// Single output regressor.
    pub fn new(predict_fn: F) -> Self {
        FnRegressor { predict_fn, n_outputs: 1 }
    }

    /// Set the number of outputs per row.
    pub fn with_outputs(mut self, n_outputs: usize) -> Self {
        self.n_outputs = n_outputs.max(1);
        self
    }
}

impl<F> Regressor for FnRegressor<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    fn predict(&self, data: &Matrix<f64>) -> RowMajorMatrix<f64> {
        from_flat((self.predict_fn)(data), self.n_outputs)
    }
}

impl<F> Estimator for FnRegressor<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    fn as_regressor(&self) -> Option<&dyn Regressor> {
        Some(self)
    }
}

/// Classifier backed by a probability function.
///
/// The function receives the data and returns row major probabilities,
/// `n_classes` values per row.
pub struct FnClassifier<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    predict_proba_fn: F,
    n_classes: usize,
}

impl<F> FnClassifier<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    pub fn new(predict_proba_fn: F, n_classes: usize) -> Self {
        FnClassifier {
            predict_proba_fn,
            n_classes: n_classes.max(1),
        }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    fn predict_proba(&self, data: &Matrix<f64>) -> RowMajorMatrix<f64> {
        from_flat((self.predict_proba_fn)(data), self.n_classes)
    }
}

impl<F> Estimator for FnClassifier<F>
where
    F: Fn(&Matrix<f64>) -> Vec<f64> + Sync,
{
    fn as_classifier(&self) -> Option<&dyn Classifier> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unfitted;
    impl Estimator for Unfitted {
        fn is_fitted(&self) -> bool {
            false
        }
    }

    struct Transformer;
    impl Estimator for Transformer {}

    struct MultiLabel;
    impl Classifier for MultiLabel {
        fn predict_proba(&self, data: &Matrix<f64>) -> RowMajorMatrix<f64> {
            RowMajorMatrix::filled(0.5, data.rows, 2)
        }
        fn is_multiclass_multioutput(&self) -> bool {
            true
        }
    }
    impl Estimator for MultiLabel {
        fn as_classifier(&self) -> Option<&dyn Classifier> {
            Some(self)
        }
    }

    #[test]
    fn test_predictor_rejects_unsupported() {
        assert!(matches!(
            Predictor::from_estimator(&Unfitted),
            Err(HStatError::UnfittedModel)
        ));
        assert!(matches!(
            Predictor::from_estimator(&Transformer),
            Err(HStatError::UnsupportedModelKind(_))
        ));
        assert!(matches!(
            Predictor::from_estimator(&MultiLabel),
            Err(HStatError::UnsupportedTargetShape)
        ));
    }

    #[test]
    fn test_binary_classifier_keeps_positive_class() {
        let clf = FnClassifier::new(
            |x: &Matrix<f64>| x.get_col(0).iter().flat_map(|v| [1.0 - v, *v]).collect(),
            2,
        );
        let v = vec![0.1, 0.7, 0.4];
        let data = Matrix::new(&v, 3, 1);
        let preds = Predictor::from_estimator(&clf).unwrap().predict(&data).unwrap();
        assert_eq!(preds.cols, 1);
        assert_eq!(preds.data, v);
    }

    #[test]
    fn test_multiclass_keeps_all_classes() {
        let clf = FnClassifier::new(|x: &Matrix<f64>| vec![1.0 / 3.0; x.rows * 3], 3);
        let v = vec![0.0, 1.0];
        let data = Matrix::new(&v, 2, 1);
        let preds = Predictor::from_estimator(&clf).unwrap().predict(&data).unwrap();
        assert_eq!((preds.rows, preds.cols), (2, 3));
    }

    #[test]
    fn test_prediction_shape_checked() {
        let reg = FnRegressor::new(|_: &Matrix<f64>| vec![0.0]);
        let v = vec![0.0, 1.0, 2.0];
        let data = Matrix::new(&v, 3, 1);
        let predictor = Predictor::from_estimator(&reg).unwrap();
        assert!(matches!(predictor.predict(&data), Err(HStatError::PredictionShape(3, 1))));
    }

    #[test]
    fn test_partial_row_is_a_shape_error() {
        let v = vec![0.0, 1.0, 2.0];
        let data = Matrix::new(&v, 3, 1);
        let reg = FnRegressor::new(|x: &Matrix<f64>| vec![0.0; x.rows * 2 + 1]).with_outputs(2);
        let predictor = Predictor::from_estimator(&reg).unwrap();
        assert!(matches!(predictor.predict(&data), Err(HStatError::PredictionShape(3, 4))));
        let short = FnRegressor::new(|x: &Matrix<f64>| vec![0.0; x.rows * 2 - 1]).with_outputs(2);
        let predictor = Predictor::from_estimator(&short).unwrap();
        assert!(matches!(predictor.predict(&data), Err(HStatError::PredictionShape(3, 3))));
        let clf = FnClassifier::new(|x: &Matrix<f64>| vec![0.5; x.rows * 2 + 1], 2);
        let predictor = Predictor::from_estimator(&clf).unwrap();
        assert!(matches!(predictor.predict(&data), Err(HStatError::PredictionShape(3, 4))));
    }

    #[test]
    fn test_multi_output_regressor() {
        let reg = FnRegressor::new(|x: &Matrix<f64>| x.get_col(0).iter().flat_map(|v| [*v, 2.0 * v]).collect())
            .with_outputs(2);
        let v = vec![1.0, 2.0];
        let data = Matrix::new(&v, 2, 1);
        let preds = Predictor::from_estimator(&reg).unwrap().predict(&data).unwrap();
        assert_eq!(preds.row(1), &[2.0, 4.0]);
    }
}
