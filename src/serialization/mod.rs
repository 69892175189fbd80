//! Model Serialization Module
//!
//! The classifier exposes one entry point,
//! [`GaussianNaiveBayes::serialize_with`](crate::naive_bayes::GaussianNaiveBayes::serialize_with),
//! that visits every field of its state through an [`Archive`]. The same
//! call writes when handed a writer and reads when handed a reader.
//!
//! Fields are visited in a fixed order:
//! `n_features`, `n_classes`, `training_points`, `means`, `variances`,
//! `priors`. Each tensor is visited together with the shape implied by the
//! scalars, so a reader rejects a mismatched tensor before anything is
//! allocated for it.
//!
//! ## `SafeTensors` Format
//! ```text
//! [8-byte header: u64 metadata length (little-endian)]
//! [JSON metadata: tensor names, dtypes, shapes, data_offsets, __metadata__]
//! [Raw tensor data: F64 values in little-endian, column-major]
//! ```
//!
//! Example:
//! ```rust
//! use gaussian_nb::naive_bayes::GaussianNaiveBayes;
//! use gaussian_nb::primitives::Matrix;
//! use gaussian_nb::serialization::{SafeTensorsReader, SafeTensorsWriter};
//!
//! let x = Matrix::from_vec(1, 4, vec![0.0, 1.0, 9.0, 10.0]).unwrap();
//! let mut model = GaussianNaiveBayes::from_data(&x, &[0, 0, 1, 1], 2, Default::default()).unwrap();
//!
//! let mut writer = SafeTensorsWriter::new();
//! model.serialize_with(&mut writer).unwrap();
//! let bytes = writer.to_bytes().unwrap();
//!
//! let mut reader = SafeTensorsReader::from_bytes(bytes).unwrap();
//! let mut restored = GaussianNaiveBayes::new(0, 0);
//! restored.serialize_with(&mut reader).unwrap();
//! assert_eq!(restored.means(), model.means());
//! ```

pub mod safetensors;

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

pub use safetensors::{SafeTensorsReader, SafeTensorsWriter, TensorMetadata};

/// Bidirectional field visitor used by model `serialize_with` methods.
///
/// When [`Archive::is_loading`] is false every method records the given
/// value; when true every method overwrites it with the stored value.
pub trait Archive {
    /// True if this archive reads values into the visited fields.
    fn is_loading(&self) -> bool;

    /// Visits an unsigned scalar field.
    ///
    /// # Errors
    ///
    /// Returns an error if a loading archive lacks the field or it is malformed.
    fn scalar(&mut self, name: &str, value: &mut u64) -> Result<()>;

    /// Visits a dense matrix field expected to have `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` or the stored tensor differs from `shape`,
    /// or a loading archive lacks the field.
    fn matrix(&mut self, name: &str, shape: (usize, usize), value: &mut Matrix<f64>) -> Result<()>;

    /// Visits a vector field expected to have `len` elements.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` or the stored tensor differs from `len`,
    /// or a loading archive lacks the field.
    fn vector(&mut self, name: &str, len: usize, value: &mut Vector<f64>) -> Result<()>;
}
