//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use gaussian_nb::prelude::*;
//! ```

pub use crate::error::{NaiveBayesError, Result};
pub use crate::naive_bayes::{FitMode, GaussianNaiveBayes, NaiveBayesConfig};
pub use crate::primitives::{Matrix, Vector};
pub use crate::serialization::{Archive, SafeTensorsReader, SafeTensorsWriter};
pub use crate::traits::{Classifier, IncrementalClassifier};
