//! Per-class mean and variance estimation.
//!
//! Two strategies produce the same statistics up to round-off:
//!
//! - **Two-pass**: a grouped reduction computing each class mean, then the
//!   sum of squared deviations from it.
//! - **Incremental**: the pairwise population merge of Chan, Golub and
//!   LeVeque, applied either to a whole batch summary or to one point at a
//!   time.
//!
//! Variances are unbiased sample variances (`n - 1` denominator) and are
//! zero for classes with fewer than two points.

use super::state::ModelState;
use crate::error::{NaiveBayesError, Result};
use crate::primitives::{Matrix, Vector};

/// Sufficient statistics for every class: counts, means and variances.
///
/// `means` and `variances` are `D × C`; column `j` belongs to class `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMoments {
    counts: Vec<usize>,
    means: Matrix<f64>,
    variances: Matrix<f64>,
}

impl ClassMoments {
    /// Statistics of an empty population.
    #[must_use]
    pub fn empty(n_features: usize, n_classes: usize) -> Self {
        Self {
            counts: vec![0; n_classes],
            means: Matrix::zeros(n_features, n_classes),
            variances: Matrix::zeros(n_features, n_classes),
        }
    }

    /// Recovers the statistics a fitted state was built from.
    #[must_use]
    pub fn from_state(state: &ModelState) -> Self {
        Self {
            counts: state.class_counts(),
            means: state.means().clone(),
            variances: state.variances().clone(),
        }
    }

    /// Summarizes a labeled batch with the two-pass grouped reduction.
    ///
    /// # Errors
    ///
    /// Returns an error if the labels don't match the batch or fall outside
    /// `[0, n_classes)`.
    pub fn two_pass(x: &Matrix<f64>, labels: &[usize], n_classes: usize) -> Result<Self> {
        validate_labels(x, labels, n_classes)?;
        let (d, n) = x.shape();
        let mut moments = Self::empty(d, n_classes);
        for &label in labels {
            moments.counts[label] += 1;
        }

        let data = x.as_slice();
        let mut sums = vec![0.0; n_classes];
        for i in 0..d {
            let row = &data[i * n..(i + 1) * n];

            sums.iter_mut().for_each(|s| *s = 0.0);
            for (&v, &label) in row.iter().zip(labels) {
                sums[label] += v;
            }
            for (j, &sum) in sums.iter().enumerate() {
                if moments.counts[j] > 0 {
                    moments.means.set(i, j, sum / moments.counts[j] as f64);
                }
            }

            sums.iter_mut().for_each(|s| *s = 0.0);
            for (&v, &label) in row.iter().zip(labels) {
                let delta = v - moments.means.get(i, label);
                sums[label] += delta * delta;
            }
            for (j, &ss) in sums.iter().enumerate() {
                if moments.counts[j] > 1 {
                    moments.variances.set(i, j, ss / (moments.counts[j] - 1) as f64);
                }
            }
        }

        Ok(moments)
    }

    /// Summarizes a labeled batch by folding in one point at a time.
    ///
    /// Slower than [`ClassMoments::two_pass`] but never forms a large sum
    /// of squares, which keeps precision when means are large relative to
    /// spreads.
    ///
    /// # Errors
    ///
    /// Returns an error if the labels don't match the batch or fall outside
    /// `[0, n_classes)`.
    pub fn incremental(x: &Matrix<f64>, labels: &[usize], n_classes: usize) -> Result<Self> {
        validate_labels(x, labels, n_classes)?;
        let mut moments = Self::empty(x.n_rows(), n_classes);
        for (k, &label) in labels.iter().enumerate() {
            moments.push(x.column(k).as_slice(), label)?;
        }
        Ok(moments)
    }

    /// Merges a single observation into class `label`.
    ///
    /// Equivalent to [`ClassMoments::merge`] with a one-point population
    /// whose mean is `point` and whose variance is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if `point` has the wrong length or `label` is out
    /// of range.
    pub fn push(&mut self, point: &[f64], label: usize) -> Result<()> {
        if point.len() != self.n_features() {
            return Err(NaiveBayesError::dimension_mismatch(
                "features",
                self.n_features(),
                point.len(),
            ));
        }
        if label >= self.n_classes() {
            return Err(NaiveBayesError::InvalidLabel {
                label,
                n_classes: self.n_classes(),
            });
        }

        let n_old = self.counts[label] as f64;
        let n = n_old + 1.0;
        for (i, &x) in point.iter().enumerate() {
            let mean_old = self.means.get(i, label);
            let delta = x - mean_old;
            let m2_old = self.variances.get(i, label) * (n_old - 1.0).max(0.0);
            let m2 = m2_old + delta * delta * (n_old / n);
            self.means.set(i, label, mean_old + delta / n);
            self.variances.set(i, label, m2 / (n - 1.0).max(1.0));
        }
        self.counts[label] += 1;
        Ok(())
    }

    /// Combines `other` into `self` as if both populations had been
    /// observed together.
    ///
    /// Classes absent from `other` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the two summaries differ in shape.
    pub fn merge(&mut self, other: &ClassMoments) -> Result<()> {
        if self.means.shape() != other.means.shape() {
            let (d, c) = self.means.shape();
            let (od, oc) = other.means.shape();
            return Err(NaiveBayesError::DimensionMismatch {
                expected: format!("{d}x{c}"),
                actual: format!("{od}x{oc}"),
            });
        }

        for j in 0..self.n_classes() {
            let n_new = other.counts[j];
            if n_new == 0 {
                continue;
            }
            let n_old = self.counts[j] as f64;
            let n_new_f = n_new as f64;
            let n = n_old + n_new_f;

            for i in 0..self.n_features() {
                let mean_old = self.means.get(i, j);
                let delta = other.means.get(i, j) - mean_old;
                let m2_old = self.variances.get(i, j) * (n_old - 1.0).max(0.0);
                let m2_new = other.variances.get(i, j) * (n_new_f - 1.0).max(0.0);
                let m2 = m2_old + m2_new + delta * delta * (n_old * n_new_f / n);

                self.means.set(i, j, mean_old + delta * (n_new_f / n));
                self.variances.set(i, j, m2 / (n - 1.0).max(1.0));
            }
            self.counts[j] += n_new;
        }
        Ok(())
    }

    /// Number of points per class.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of points across classes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Feature dimensionality.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.means.n_rows()
    }

    /// Number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    /// Per-class means (`D × C`).
    #[must_use]
    pub fn means(&self) -> &Matrix<f64> {
        &self.means
    }

    /// Per-class sample variances (`D × C`).
    #[must_use]
    pub fn variances(&self) -> &Matrix<f64> {
        &self.variances
    }

    /// Converts the summary into model parameters with `priors[j] = n_j / N`.
    ///
    /// An empty summary yields zero priors.
    #[must_use]
    pub fn into_state(self) -> ModelState {
        let total = self.total();
        let priors = if total == 0 {
            Vector::zeros(self.counts.len())
        } else {
            Vector::from_vec(
                self.counts
                    .iter()
                    .map(|&c| c as f64 / total as f64)
                    .collect(),
            )
        };
        let mut state = ModelState::zeros(self.means.n_rows(), self.counts.len());
        *state.means_mut() = self.means;
        *state.variances_mut() = self.variances;
        *state.priors_mut() = priors;
        state.set_training_points(total);
        state
    }
}

/// Checks that `labels` has one entry per column of `x`, each below `n_classes`.
///
/// # Errors
///
/// Returns `DimensionMismatch` or `InvalidLabel`.
pub fn validate_labels(x: &Matrix<f64>, labels: &[usize], n_classes: usize) -> Result<()> {
    if labels.len() != x.n_cols() {
        return Err(NaiveBayesError::dimension_mismatch(
            "labels",
            x.n_cols(),
            labels.len(),
        ));
    }
    if let Some(&label) = labels.iter().find(|&&l| l >= n_classes) {
        return Err(NaiveBayesError::InvalidLabel { label, n_classes });
    }
    Ok(())
}

#[cfg(test)]
#[path = "moments_tests.rs"]
mod tests;
