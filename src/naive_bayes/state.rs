//! Fitted parameters of a Gaussian Naive Bayes model.

use crate::error::{NaiveBayesError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Plain-data container of per-class Gaussian parameters.
///
/// Column `j` of `means` and `variances` describes class `j`; rows index
/// features. Shapes are `D × C`, `D × C`, and `C`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    means: Matrix<f64>,
    variances: Matrix<f64>,
    priors: Vector<f64>,
    training_points: usize,
}

impl ModelState {
    /// Creates an untrained state: all parameters zero, no points seen.
    #[must_use]
    pub fn zeros(n_features: usize, n_classes: usize) -> Self {
        Self {
            means: Matrix::zeros(n_features, n_classes),
            variances: Matrix::zeros(n_features, n_classes),
            priors: Vector::zeros(n_classes),
            training_points: 0,
        }
    }

    /// Assembles a state from explicit parameters, checking shapes.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `variances` differs in shape from
    /// `means` or `priors.len()` differs from the number of columns.
    pub fn new(
        means: Matrix<f64>,
        variances: Matrix<f64>,
        priors: Vector<f64>,
        training_points: usize,
    ) -> Result<Self> {
        let state = Self {
            means,
            variances,
            priors,
            training_points,
        };
        state.check_shapes()?;
        Ok(state)
    }

    /// Verifies `means`, `variances` and `priors` agree on `D` and `C`, and
    /// that each matrix holds exactly `rows * cols` values.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` describing the first disagreement.
    pub fn check_shapes(&self) -> Result<()> {
        for (name, matrix) in [("means", &self.means), ("variances", &self.variances)] {
            let (rows, cols) = matrix.shape();
            if rows.checked_mul(cols) != Some(matrix.as_slice().len()) {
                return Err(NaiveBayesError::DimensionMismatch {
                    expected: format!("{name} storage of {rows}x{cols}"),
                    actual: format!("{} values", matrix.as_slice().len()),
                });
            }
        }
        let (d, c) = self.means.shape();
        if self.variances.shape() != (d, c) {
            let (vd, vc) = self.variances.shape();
            return Err(NaiveBayesError::DimensionMismatch {
                expected: format!("variances {d}x{c}"),
                actual: format!("{vd}x{vc}"),
            });
        }
        if self.priors.len() != c {
            return Err(NaiveBayesError::dimension_mismatch(
                "priors",
                c,
                self.priors.len(),
            ));
        }
        Ok(())
    }

    /// Feature dimensionality `D`.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.means.n_rows()
    }

    /// Number of classes `C`.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.means.n_cols()
    }

    /// Per-class feature means (`D × C`).
    #[must_use]
    pub fn means(&self) -> &Matrix<f64> {
        &self.means
    }

    /// Per-class feature sample variances (`D × C`).
    #[must_use]
    pub fn variances(&self) -> &Matrix<f64> {
        &self.variances
    }

    /// Class prior probabilities (length `C`).
    #[must_use]
    pub fn priors(&self) -> &Vector<f64> {
        &self.priors
    }

    /// Total number of samples incorporated so far.
    #[must_use]
    pub fn training_points(&self) -> usize {
        self.training_points
    }

    /// True until at least one point has been incorporated.
    #[must_use]
    pub fn is_untrained(&self) -> bool {
        self.training_points == 0
    }

    /// Per-class sample counts recovered as `round(priors[j] * training_points)`.
    ///
    /// Negative or NaN priors count as zero.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        let n = self.training_points as f64;
        self.priors
            .iter()
            .map(|&p| {
                let count = (p * n).round();
                if count.is_finite() && count > 0.0 {
                    count as usize
                } else {
                    0
                }
            })
            .collect()
    }

    pub(crate) fn means_mut(&mut self) -> &mut Matrix<f64> {
        &mut self.means
    }

    pub(crate) fn variances_mut(&mut self) -> &mut Matrix<f64> {
        &mut self.variances
    }

    pub(crate) fn priors_mut(&mut self) -> &mut Vector<f64> {
        &mut self.priors
    }

    pub(crate) fn set_training_points(&mut self, training_points: usize) {
        self.training_points = training_points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shapes() {
        let state = ModelState::zeros(3, 2);
        assert_eq!(state.means().shape(), (3, 2));
        assert_eq!(state.variances().shape(), (3, 2));
        assert_eq!(state.priors().len(), 2);
        assert!(state.is_untrained());
        assert!(state.priors().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_new_rejects_variance_shape() {
        let result = ModelState::new(
            Matrix::zeros(2, 2),
            Matrix::zeros(2, 3),
            Vector::zeros(2),
            0,
        );
        assert!(matches!(
            result,
            Err(NaiveBayesError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_new_rejects_prior_length() {
        let result = ModelState::new(
            Matrix::zeros(2, 2),
            Matrix::zeros(2, 2),
            Vector::zeros(3),
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_class_counts_recovered_from_priors() {
        let state = ModelState::new(
            Matrix::zeros(1, 3),
            Matrix::zeros(1, 3),
            Vector::from_slice(&[1.0 / 3.0, 0.5, 1.0 / 6.0]),
            6,
        )
        .expect("consistent shapes");
        assert_eq!(state.class_counts(), vec![2, 3, 1]);
    }

    #[test]
    fn test_class_counts_ignore_invalid_priors() {
        let state = ModelState::new(
            Matrix::zeros(1, 2),
            Matrix::zeros(1, 2),
            Vector::from_slice(&[f64::NAN, -0.5]),
            4,
        )
        .expect("consistent shapes");
        assert_eq!(state.class_counts(), vec![0, 0]);
    }

    #[test]
    fn test_check_shapes_rejects_short_storage() {
        let json = r#"{
            "means": {"data": [0.0, 1.0], "rows": 4294967296, "cols": 4294967297},
            "variances": {"data": [1.0, 1.0], "rows": 1, "cols": 2},
            "priors": {"data": [0.5, 0.5]},
            "training_points": 2
        }"#;
        let state: ModelState = serde_json::from_str(json).expect("well-formed JSON");
        assert!(matches!(
            state.check_shapes(),
            Err(NaiveBayesError::DimensionMismatch { .. })
        ));
    }
}
