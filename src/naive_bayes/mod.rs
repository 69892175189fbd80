//! Gaussian Naive Bayes classification.
//!
//! Each class `j` is modeled as an axis-aligned Gaussian with per-feature
//! mean `μ_ij` and variance `σ²_ij`, weighted by a prior `π_j`. Data are
//! laid out with one sample per **column**: a batch is a `D × N` matrix.
//!
//! The model can be trained
//! - from a batch, replacing everything learned so far ([`FitMode::Replace`]);
//! - from a batch, merged into the current state ([`FitMode::Merge`]);
//! - one labeled point at a time ([`GaussianNaiveBayes::fit_one`]).
//!
//! Merging uses the pairwise update of Chan, Golub and LeVeque, so splitting
//! a dataset into chunks gives the same parameters as one batch fit (up to
//! round-off).
//!
//! # Example
//!
//! ```
//! use gaussian_nb::naive_bayes::{GaussianNaiveBayes, NaiveBayesConfig};
//! use gaussian_nb::primitives::{Matrix, Vector};
//!
//! // One feature, six samples: class 0 near 0, class 1 near 10.
//! let x = Matrix::from_vec(1, 6, vec![-1.0, 0.0, 1.0, 9.0, 10.0, 11.0]).unwrap();
//! let labels = [0, 0, 0, 1, 1, 1];
//!
//! let model = GaussianNaiveBayes::from_data(&x, &labels, 2, NaiveBayesConfig::default()).unwrap();
//! assert_eq!(model.classify(&Vector::from_slice(&[2.0])).unwrap(), 0);
//! assert_eq!(model.classify(&Vector::from_slice(&[8.0])).unwrap(), 1);
//! ```

mod likelihood;
mod moments;
mod state;

pub use likelihood::{argmax, argmax_columns, normalize, normalize_columns};
pub use moments::ClassMoments;
pub use state::ModelState;

use crate::error::{NaiveBayesError, Result};
use crate::primitives::{Matrix, Vector};
use crate::serialization::{Archive, SafeTensorsReader, SafeTensorsWriter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Training options for [`GaussianNaiveBayes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NaiveBayesConfig {
    /// Estimate Replace-mode moments one point at a time instead of with
    /// the two-pass reduction. Slower, but stable when feature means are
    /// large compared to their spread.
    pub incremental_variance: bool,
}

impl NaiveBayesConfig {
    /// Sets [`NaiveBayesConfig::incremental_variance`].
    #[must_use]
    pub fn with_incremental_variance(mut self, incremental_variance: bool) -> Self {
        self.incremental_variance = incremental_variance;
        self
    }
}

/// How a batch interacts with previously learned parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Discard the current state and fit from the batch alone.
    Replace,
    /// Fold the batch into the current state.
    Merge,
}

/// Gaussian Naive Bayes classifier supporting batch and incremental training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNaiveBayes {
    state: ModelState,
    config: NaiveBayesConfig,
}

impl GaussianNaiveBayes {
    /// Creates an untrained model for `n_features`-dimensional data and
    /// `n_classes` classes.
    ///
    /// All parameters are zero. Until trained, every class scores `−∞` and
    /// classification returns class 0 with uniform posteriors.
    #[must_use]
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        Self {
            state: ModelState::zeros(n_features, n_classes),
            config: NaiveBayesConfig::default(),
        }
    }

    /// Replaces the training options.
    #[must_use]
    pub fn with_config(mut self, config: NaiveBayesConfig) -> Self {
        self.config = config;
        self
    }

    /// Selects the incremental moment estimator for Replace-mode fits.
    ///
    /// # Example
    ///
    /// ```
    /// use gaussian_nb::naive_bayes::GaussianNaiveBayes;
    ///
    /// let model = GaussianNaiveBayes::new(3, 2).with_incremental_variance(true);
    /// assert!(model.config().incremental_variance);
    /// ```
    #[must_use]
    pub fn with_incremental_variance(mut self, incremental_variance: bool) -> Self {
        self.config.incremental_variance = incremental_variance;
        self
    }

    /// Builds a model by fitting a labeled `D × N` batch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` if `n_classes` is zero, and otherwise
    /// the errors of [`GaussianNaiveBayes::fit_replace`].
    pub fn from_data(
        x: &Matrix<f64>,
        labels: &[usize],
        n_classes: usize,
        config: NaiveBayesConfig,
    ) -> Result<Self> {
        if n_classes == 0 {
            return Err(NaiveBayesError::InvalidHyperparameter {
                param: "n_classes".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        let mut model = Self::new(x.n_rows(), n_classes).with_config(config);
        model.fit_replace(x, labels)?;
        Ok(model)
    }

    /// Current training options.
    #[must_use]
    pub fn config(&self) -> &NaiveBayesConfig {
        &self.config
    }

    /// Trains on a labeled batch in the given mode.
    ///
    /// # Errors
    ///
    /// See [`GaussianNaiveBayes::fit_replace`] and
    /// [`GaussianNaiveBayes::fit_merge`].
    pub fn train(&mut self, x: &Matrix<f64>, labels: &[usize], mode: FitMode) -> Result<()> {
        match mode {
            FitMode::Replace => self.fit_replace(x, labels),
            FitMode::Merge => self.fit_merge(x, labels),
        }
    }

    /// Fits from `x` alone, discarding previous parameters.
    ///
    /// The number of classes is kept; the feature dimensionality is taken
    /// from `x`. Classes absent from the batch get prior 0.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for a batch with no columns, `DimensionMismatch`
    /// if `labels.len()` differs from the column count, and `InvalidLabel`
    /// for a label outside `[0, C)`. The model is unchanged on error.
    pub fn fit_replace(&mut self, x: &Matrix<f64>, labels: &[usize]) -> Result<()> {
        if x.n_cols() == 0 {
            return Err(NaiveBayesError::empty_input("replace-mode batch has no samples"));
        }
        let n_classes = self.n_classes();
        let moments = if self.config.incremental_variance {
            ClassMoments::incremental(x, labels, n_classes)?
        } else {
            ClassMoments::two_pass(x, labels, n_classes)?
        };
        log::debug!(
            "replace fit: {} samples, {} features, {} of {n_classes} classes present",
            x.n_cols(),
            x.n_rows(),
            moments.counts().iter().filter(|&&c| c > 0).count()
        );
        self.state = moments.into_state();
        Ok(())
    }

    /// Merges a batch into the current parameters.
    ///
    /// An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x` has a different feature count than
    /// the model or `labels.len()` differs from the column count, and
    /// `InvalidLabel` for a label outside `[0, C)`. The model is unchanged
    /// on error.
    pub fn fit_merge(&mut self, x: &Matrix<f64>, labels: &[usize]) -> Result<()> {
        if labels.len() != x.n_cols() {
            return Err(NaiveBayesError::dimension_mismatch(
                "labels",
                x.n_cols(),
                labels.len(),
            ));
        }
        if x.n_cols() == 0 {
            return Ok(());
        }
        if x.n_rows() != self.n_features() {
            return Err(NaiveBayesError::dimension_mismatch(
                "features",
                self.n_features(),
                x.n_rows(),
            ));
        }

        self.state.check_shapes()?;
        let n_classes = self.n_classes();
        let batch = ClassMoments::two_pass(x, labels, n_classes)?;
        let mut moments = ClassMoments::from_state(&self.state);
        moments.merge(&batch)?;
        log::debug!(
            "merge fit: {} samples into {} seen, {} total",
            x.n_cols(),
            self.training_points(),
            moments.total()
        );
        self.state = moments.into_state();
        Ok(())
    }

    /// Incorporates a single labeled point.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `point.len()` differs from the feature
    /// count and `InvalidLabel` if `label >= C`. The model is unchanged on
    /// error.
    pub fn fit_one(&mut self, point: &Vector<f64>, label: usize) -> Result<()> {
        self.state.check_shapes()?;
        let mut moments = ClassMoments::from_state(&self.state);
        moments.push(point.as_slice(), label)?;
        log::trace!("point fit: label {label}, {} total", moments.total());
        self.state = moments.into_state();
        Ok(())
    }

    /// Unnormalized class log-posteriors for one point (length `C`).
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `point.len()` differs from `D`.
    pub fn log_likelihood(&self, point: &Vector<f64>) -> Result<Vector<f64>> {
        likelihood::log_likelihood(&self.state, point)
    }

    /// Unnormalized class log-posteriors for every column of `x` (`C × N`).
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x.n_rows()` differs from `D`.
    pub fn log_likelihood_batch(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        likelihood::log_likelihood_batch(&self.state, x)
    }

    /// Most probable class for one point. Ties go to the smallest index.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `point.len()` differs from `D`.
    pub fn classify(&self, point: &Vector<f64>) -> Result<usize> {
        let scores = self.log_likelihood(point)?;
        Ok(argmax(scores.as_slice()))
    }

    /// Most probable class for one point together with the posterior
    /// probabilities of every class.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `point.len()` differs from `D`.
    pub fn classify_with_proba(&self, point: &Vector<f64>) -> Result<(usize, Vector<f64>)> {
        let scores = self.log_likelihood(point)?;
        Ok((argmax(scores.as_slice()), normalize(scores.as_slice())))
    }

    /// Most probable class for every column of `x`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x.n_rows()` differs from `D`.
    pub fn classify_batch(&self, x: &Matrix<f64>) -> Result<Vec<usize>> {
        let scores = self.log_likelihood_batch(x)?;
        Ok(argmax_columns(&scores))
    }

    /// Labels and a `C × N` posterior matrix for every column of `x`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x.n_rows()` differs from `D`.
    pub fn classify_batch_with_proba(&self, x: &Matrix<f64>) -> Result<(Vec<usize>, Matrix<f64>)> {
        let scores = self.log_likelihood_batch(x)?;
        Ok((argmax_columns(&scores), normalize_columns(&scores)))
    }

    /// Per-class feature means (`D × C`).
    #[must_use]
    pub fn means(&self) -> &Matrix<f64> {
        self.state.means()
    }

    /// Mutable per-class feature means.
    pub fn means_mut(&mut self) -> &mut Matrix<f64> {
        self.state.means_mut()
    }

    /// Per-class feature variances (`D × C`).
    #[must_use]
    pub fn variances(&self) -> &Matrix<f64> {
        self.state.variances()
    }

    /// Mutable per-class feature variances.
    ///
    /// Training never floors variances; install a floor here (or with
    /// [`GaussianNaiveBayes::apply_variance_floor`]) if degenerate features
    /// are expected.
    pub fn variances_mut(&mut self) -> &mut Matrix<f64> {
        self.state.variances_mut()
    }

    /// Class priors (length `C`).
    #[must_use]
    pub fn priors(&self) -> &Vector<f64> {
        self.state.priors()
    }

    /// Mutable class priors.
    pub fn priors_mut(&mut self) -> &mut Vector<f64> {
        self.state.priors_mut()
    }

    /// Total number of samples incorporated.
    #[must_use]
    pub fn training_points(&self) -> usize {
        self.state.training_points()
    }

    /// Feature dimensionality `D`.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.state.n_features()
    }

    /// Number of classes `C`.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.state.n_classes()
    }

    /// Read-only view of all fitted parameters.
    #[must_use]
    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// Installs explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the shapes disagree; the model is
    /// unchanged in that case.
    pub fn replace_state(
        &mut self,
        means: Matrix<f64>,
        variances: Matrix<f64>,
        priors: Vector<f64>,
        training_points: usize,
    ) -> Result<()> {
        self.state = ModelState::new(means, variances, priors, training_points)?;
        Ok(())
    }

    /// Raises every variance below `floor` to `floor`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` if `floor` is negative or NaN.
    pub fn apply_variance_floor(&mut self, floor: f64) -> Result<()> {
        if floor.is_nan() || floor < 0.0 {
            return Err(NaiveBayesError::InvalidHyperparameter {
                param: "variance_floor".to_string(),
                value: floor.to_string(),
                constraint: ">= 0".to_string(),
            });
        }
        let floored = self.state.variances().map(|v| v.max(floor));
        *self.state.variances_mut() = floored;
        Ok(())
    }

    /// Forgets everything learned, keeping `D`, `C` and the config.
    pub fn reset(&mut self) {
        self.state = ModelState::zeros(self.n_features(), self.n_classes());
    }

    /// Writes the model to `archive`, or reads it back when the archive is
    /// loading.
    ///
    /// Fields are visited as `n_features`, `n_classes`, `training_points`,
    /// `means`, `variances`, `priors`. Each tensor is visited with the shape
    /// given by the scalars; the model is only replaced once everything has
    /// been read successfully.
    ///
    /// # Errors
    ///
    /// Propagates archive errors; scalars whose element counts overflow
    /// `usize` are reported as `FormatError`.
    pub fn serialize_with<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        let mut n_features = self.n_features() as u64;
        let mut n_classes = self.n_classes() as u64;
        let mut training_points = self.training_points() as u64;
        archive.scalar("n_features", &mut n_features)?;
        archive.scalar("n_classes", &mut n_classes)?;
        archive.scalar("training_points", &mut training_points)?;

        let d = scalar_to_usize("n_features", n_features)?;
        let c = scalar_to_usize("n_classes", n_classes)?;
        if d.checked_mul(c).is_none() {
            return Err(NaiveBayesError::format(format!(
                "n_features = {d} by n_classes = {c} overflows usize"
            )));
        }

        if !archive.is_loading() {
            archive.matrix("means", (d, c), self.state.means_mut())?;
            archive.matrix("variances", (d, c), self.state.variances_mut())?;
            archive.vector("priors", c, self.state.priors_mut())?;
            return Ok(());
        }

        // Placeholders; the archive replaces them with the stored tensors.
        let mut means = Matrix::zeros(0, 0);
        let mut variances = Matrix::zeros(0, 0);
        let mut priors = Vector::zeros(0);
        archive.matrix("means", (d, c), &mut means)?;
        archive.matrix("variances", (d, c), &mut variances)?;
        archive.vector("priors", c, &mut priors)?;
        let training_points = scalar_to_usize("training_points", training_points)?;
        self.state = ModelState::new(means, variances, priors, training_points)?;
        Ok(())
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a model saved with [`GaussianNaiveBayes::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails, or the
    /// stored parameters have inconsistent shapes.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        let model: Self = bincode::deserialize(&bytes)?;
        model.state.check_shapes()?;
        Ok(model)
    }

    /// Saves the model in `SafeTensors` format with `F64` tensors.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or file writing fails.
    pub fn save_safetensors<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = SafeTensorsWriter::new();
        self.clone().serialize_with(&mut writer)?;
        writer.save(path)
    }

    /// Loads a model saved with [`GaussianNaiveBayes::save_safetensors`].
    ///
    /// The returned model uses the default [`NaiveBayesConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or any field is missing
    /// or malformed.
    pub fn load_safetensors<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = SafeTensorsReader::open(path)?;
        let mut model = Self::new(0, 0);
        model.serialize_with(&mut reader)?;
        Ok(model)
    }
}

fn scalar_to_usize(name: &str, value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| NaiveBayesError::format(format!("{name} = {value} overflows usize")))
}
