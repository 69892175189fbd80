//! Core traits for classifiers.
//!
//! Samples are matrix **columns**: every `x` argument is a `D × N` matrix
//! holding `N` points of dimension `D`.

use crate::error::{NaiveBayesError, Result};
use crate::naive_bayes::GaussianNaiveBayes;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised classifiers over integer labels `0..C`.
///
/// # Examples
///
/// ```
/// use gaussian_nb::prelude::*;
///
/// let x = Matrix::from_vec(2, 4, vec![
///     0.0, 0.2, 5.0, 5.2, // feature 0
///     1.0, 1.1, 8.0, 8.3, // feature 1
/// ]).unwrap();
/// let labels = [0, 0, 1, 1];
///
/// let mut model = GaussianNaiveBayes::new(2, 2);
/// model.fit(&x, &labels).unwrap();
/// assert_eq!(model.predict(&x).unwrap(), vec![0, 0, 1, 1]);
/// assert_eq!(model.score(&x, &labels).unwrap(), 1.0);
/// ```
pub trait Classifier {
    /// Fits the model to a labeled batch, discarding prior training.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty or labels don't match it.
    fn fit(&mut self, x: &Matrix<f64>, labels: &[usize]) -> Result<()>;

    /// Predicts a label for every column of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has the wrong number of features.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<usize>>;

    /// Class posterior probabilities as a `C × N` matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has the wrong number of features.
    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Fraction of columns of `x` whose predicted label equals `labels`.
    ///
    /// # Errors
    ///
    /// Returns an error if `labels.len()` differs from the column count,
    /// the batch is empty, or prediction fails.
    fn score(&self, x: &Matrix<f64>, labels: &[usize]) -> Result<f64> {
        if labels.len() != x.n_cols() {
            return Err(NaiveBayesError::dimension_mismatch(
                "labels",
                x.n_cols(),
                labels.len(),
            ));
        }
        if labels.is_empty() {
            return Err(NaiveBayesError::empty_input("cannot score an empty batch"));
        }
        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(labels)
            .filter(|(p, y)| p == y)
            .count();
        Ok(correct as f64 / labels.len() as f64)
    }
}

/// Classifiers that can absorb new data without refitting from scratch.
pub trait IncrementalClassifier: Classifier {
    /// Folds a labeled batch into the current model.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch doesn't match the model's dimensions.
    fn partial_fit(&mut self, x: &Matrix<f64>, labels: &[usize]) -> Result<()>;

    /// Folds one labeled point into the current model.
    ///
    /// # Errors
    ///
    /// Returns an error if the point or label is out of range.
    fn partial_fit_one(&mut self, point: &Vector<f64>, label: usize) -> Result<()>;

    /// Number of samples seen so far.
    fn n_samples_seen(&self) -> u64;

    /// Reset internal state (for retraining from scratch).
    fn reset(&mut self);
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, x: &Matrix<f64>, labels: &[usize]) -> Result<()> {
        self.fit_replace(x, labels)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<usize>> {
        self.classify_batch(x)
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let (_, probs) = self.classify_batch_with_proba(x)?;
        Ok(probs)
    }
}

impl IncrementalClassifier for GaussianNaiveBayes {
    fn partial_fit(&mut self, x: &Matrix<f64>, labels: &[usize]) -> Result<()> {
        self.fit_merge(x, labels)
    }

    fn partial_fit_one(&mut self, point: &Vector<f64>, label: usize) -> Result<()> {
        self.fit_one(point, label)
    }

    fn n_samples_seen(&self) -> u64 {
        self.training_points() as u64
    }

    fn reset(&mut self) {
        GaussianNaiveBayes::reset(self);
    }
}
