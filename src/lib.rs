//! Gaussian Naive Bayes classification with batch and incremental training.
//!
//! The classifier keeps per-class feature means, variances and priors, and
//! can be trained from a full batch, merged with further batches, or fed
//! one labeled point at a time. Classification is batched: the class scores
//! of a whole `D × N` input are computed with three matrix products.
//!
//! # Quick Start
//!
//! ```
//! use gaussian_nb::prelude::*;
//!
//! // Two features, one sample per column.
//! let x = Matrix::from_vec(2, 6, vec![
//!     1.0, 1.2, 0.8, 6.0, 6.3, 5.9,
//!     2.0, 2.1, 1.9, 7.0, 7.2, 6.8,
//! ]).unwrap();
//! let labels = [0, 0, 0, 1, 1, 1];
//!
//! let mut model = GaussianNaiveBayes::from_data(&x, &labels, 2, NaiveBayesConfig::default()).unwrap();
//!
//! // Later data is merged without revisiting the first batch.
//! let more = Matrix::from_vec(2, 2, vec![1.1, 6.1, 2.2, 7.1]).unwrap();
//! model.train(&more, &[0, 1], FitMode::Merge).unwrap();
//! assert_eq!(model.training_points(), 8);
//!
//! let (label, probs) = model.classify_with_proba(&Vector::from_slice(&[5.5, 6.5])).unwrap();
//! assert_eq!(label, 1);
//! assert!((probs.sum() - 1.0).abs() < 1e-12);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`naive_bayes`]: The classifier, its state, moment estimation and scoring
//! - [`serialization`]: Model serialization (SafeTensors format)
//! - [`traits`]: `Classifier` / `IncrementalClassifier` seams
//! - [`error`]: Error type shared by every fallible operation

pub mod error;
pub mod naive_bayes;
pub mod prelude;
pub mod primitives;
pub mod serialization;
pub mod traits;

pub use error::{NaiveBayesError, Result};
pub use naive_bayes::{FitMode, GaussianNaiveBayes, NaiveBayesConfig};
pub use primitives::{Matrix, Vector};
pub use traits::{Classifier, IncrementalClassifier};
