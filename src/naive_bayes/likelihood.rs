//! Batched evaluation of unnormalized class log-posteriors.
//!
//! For class `j` and point `x` the score is
//!
//! ```text
//! log π_j − (D/2) log(2π) − ½ Σ_i log σ²_ij − ½ Σ_i (x_i − μ_ij)² / σ²_ij
//! ```
//!
//! The quadratic term for a whole `D × N` batch is assembled from three
//! matrix products instead of a per-point loop:
//!
//! ```text
//! Q = (1/V)ᵀ X² − 2 (M/V)ᵀ X + colsum(M²/V)
//! ```
//!
//! `X` and `M` are first shifted by a per-feature reference `r_i` (the mean
//! of `μ_ij` over the classes with positive variance). `Q` is unchanged by
//! the shift, but the three terms stay on the scale of the class spread
//! instead of the scale of the raw coordinates, so features far from zero
//! do not cancel away.
//!
//! # Zero variances
//!
//! A feature with `σ²_ij <= 0` is treated as a point mass at `μ_ij`: when
//! `x_i == μ_ij` it contributes nothing (neither the quadratic nor the
//! normalizing term), otherwise the class score is `−∞`. Scores are never
//! NaN for finite inputs and non-negative priors.

use super::state::ModelState;
use crate::error::{NaiveBayesError, Result};
use crate::primitives::{Matrix, Vector};

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Computes the `C × N` matrix of class log-likelihoods for every column of `x`.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `x` has the wrong number of rows or the
/// state's parameter shapes disagree.
pub fn log_likelihood_batch(state: &ModelState, x: &Matrix<f64>) -> Result<Matrix<f64>> {
    state.check_shapes()?;
    let (d, c) = state.means().shape();
    if x.n_rows() != d {
        return Err(NaiveBayesError::dimension_mismatch(
            "features",
            d,
            x.n_rows(),
        ));
    }

    let shift = Vector::from_vec(feature_reference(state).iter().map(|r| -r).collect());
    let mut means = state.means().clone();
    means.add_row_broadcast(&shift).map_err(shape_err)?;
    let mut x_shifted = x.clone();
    x_shifted.add_row_broadcast(&shift).map_err(shape_err)?;

    let inv_var = state
        .variances()
        .map(|v| if v > 0.0 { 1.0 / v } else { 0.0 });
    let mean_over_var = means.zip_map(&inv_var, |m, iv| m * iv).map_err(shape_err)?;
    let mean_sq_over_var = means
        .zip_map(&mean_over_var, |m, mv| m * mv)
        .map_err(shape_err)?;

    let inv_var_t = inv_var.transpose();
    let x_sq = x_shifted.map(|v| v * v);
    let quad = inv_var_t.matmul(&x_sq).map_err(shape_err)?;
    let cross = mean_over_var
        .transpose()
        .matmul(&x_shifted)
        .map_err(shape_err)?;
    let offset = mean_sq_over_var.column_sums();

    let constants = class_constants(state);
    let mut scores = quad
        .zip_map(&cross, |q, cr| q - 2.0 * cr)
        .map_err(shape_err)?;
    scores
        .add_row_broadcast(&offset)
        .map_err(shape_err)?;
    // Q is a sum of squares; cancellation can leave tiny negatives.
    scores = scores.map(|q| -0.5 * q.max(0.0));
    scores
        .add_row_broadcast(&constants)
        .map_err(shape_err)?;

    mask_point_masses(state, x, &mut scores);
    log::trace!("evaluated log-likelihoods for {} points over {c} classes", x.n_cols());
    Ok(scores)
}

/// Computes the length-`C` vector of class log-likelihoods for one point.
///
/// Evaluated through the batch kernel so that point and batch results are
/// bit-identical.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `point.len()` differs from `D`.
pub fn log_likelihood(state: &ModelState, point: &Vector<f64>) -> Result<Vector<f64>> {
    let x = Matrix::from_vec(point.len(), 1, point.as_slice().to_vec()).map_err(shape_err)?;
    let scores = log_likelihood_batch(state, &x)?;
    Ok(scores.column(0))
}

/// Converts each column of log-likelihoods into posterior probabilities.
///
/// Uses the log-sum-exp shift. A column whose scores are all `−∞` becomes
/// the uniform distribution.
#[must_use]
pub fn normalize_columns(log_likelihoods: &Matrix<f64>) -> Matrix<f64> {
    let (c, n) = log_likelihoods.shape();
    let mut probs = Matrix::zeros(c, n);
    for k in 0..n {
        let column = log_likelihoods.column(k);
        probs.set_column(k, normalize(column.as_slice()).as_slice());
    }
    probs
}

/// Converts one vector of log-likelihoods into posterior probabilities.
#[must_use]
pub fn normalize(log_likelihoods: &[f64]) -> Vector<f64> {
    let c = log_likelihoods.len();
    let max = log_likelihoods
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return Vector::from_vec(vec![1.0 / c as f64; c]);
    }

    let exp: Vec<f64> = log_likelihoods
        .iter()
        .map(|&l| {
            let p = (l - max).exp();
            if p.is_nan() {
                0.0
            } else {
                p
            }
        })
        .collect();
    let sum: f64 = exp.iter().sum();
    Vector::from_vec(exp.into_iter().map(|p| p / sum).collect())
}

/// Index of the largest score; the smallest index wins ties and NaN never wins.
#[must_use]
pub fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (j, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] || (scores[best].is_nan() && !s.is_nan()) {
            best = j;
        }
    }
    best
}

/// Column-wise [`argmax`] of a `C × N` score matrix.
#[must_use]
pub fn argmax_columns(scores: &Matrix<f64>) -> Vec<usize> {
    (0..scores.n_cols())
        .map(|k| argmax(scores.column(k).as_slice()))
        .collect()
}

/// Per-feature centering point: mean of `μ_ij` over classes with `σ²_ij > 0`.
///
/// Zero for features where no class has positive variance.
fn feature_reference(state: &ModelState) -> Vector<f64> {
    let (d, c) = state.means().shape();
    let reference: Vec<f64> = (0..d)
        .map(|i| {
            let (sum, count) = (0..c)
                .filter(|&j| state.variances().get(i, j) > 0.0)
                .fold((0.0, 0_usize), |(sum, count), j| {
                    (sum + state.means().get(i, j), count + 1)
                });
            if count == 0 {
                0.0
            } else {
                sum / count as f64
            }
        })
        .collect();
    Vector::from_vec(reference)
}

/// `log π_j − ½ Σ_i log(2π σ²_ij)` over features with positive variance.
fn class_constants(state: &ModelState) -> Vector<f64> {
    let (d, c) = state.variances().shape();
    let variances = state.variances();
    let constants: Vec<f64> = (0..c)
        .map(|j| {
            let log_norm: f64 = (0..d)
                .map(|i| variances.get(i, j))
                .filter(|&v| v > 0.0)
                .map(|v| LN_2PI + v.ln())
                .sum();
            state.priors()[j].ln() - 0.5 * log_norm
        })
        .collect();
    Vector::from_vec(constants)
}

/// Sets the score to `−∞` wherever a point-mass feature is missed.
fn mask_point_masses(state: &ModelState, x: &Matrix<f64>, scores: &mut Matrix<f64>) {
    let (d, c) = state.variances().shape();
    for j in 0..c {
        for i in 0..d {
            if state.variances().get(i, j) > 0.0 {
                continue;
            }
            let mu = state.means().get(i, j);
            for k in 0..x.n_cols() {
                if x.get(i, k) != mu {
                    scores.set(j, k, f64::NEG_INFINITY);
                }
            }
        }
    }
}

fn shape_err(msg: &'static str) -> NaiveBayesError {
    NaiveBayesError::DimensionMismatch {
        expected: "consistent model shapes".to_string(),
        actual: msg.to_string(),
    }
}

#[cfg(test)]
#[path = "likelihood_tests.rs"]
mod tests;
