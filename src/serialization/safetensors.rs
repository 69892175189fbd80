//! `SafeTensors` archives for model serialization.
//!
//! Implements the `SafeTensors` layout:
//! ```text
//! [8-byte header: u64 metadata length (little-endian)]
//! [JSON metadata: tensor names, dtypes, shapes, data_offsets]
//! [Raw tensor data: F64 values in little-endian]
//! ```
//!
//! Scalars are stored as decimal strings in the `__metadata__` section.
//! Matrices are stored with shape `[rows, cols]` and column-major element
//! order; vectors with shape `[len]`.

use super::Archive;
use crate::error::{NaiveBayesError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[path = "safetensors_reader.rs"]
mod reader;

pub use reader::extract_tensor;

/// Metadata for a single tensor in `SafeTensors` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorMetadata {
    /// Data type of the tensor (`"F64"` when written by this crate).
    pub dtype: String,
    /// Shape of the tensor (e.g., `[n_features, n_classes]` or `[n_classes]`).
    pub shape: Vec<usize>,
    /// Data offsets `[start, end]` in the raw data section.
    pub data_offsets: [usize; 2],
}

/// Complete `SafeTensors` metadata structure.
/// Uses `BTreeMap` for deterministic JSON serialization (sorted keys).
pub type SafeTensorsMetadata = BTreeMap<String, TensorMetadata>;

/// User metadata from the `__metadata__` header section.
pub type UserMetadata = BTreeMap<String, String>;

/// Archive that records visited fields and encodes them as `SafeTensors`.
#[derive(Debug, Clone, Default)]
pub struct SafeTensorsWriter {
    tensors: BTreeMap<String, (Vec<f64>, Vec<usize>)>,
    user_metadata: UserMetadata,
}

impl SafeTensorsWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free-form string entry to `__metadata__`.
    pub fn set_metadata(&mut self, key: &str, value: &str) {
        self.user_metadata
            .insert(key.to_string(), value.to_string());
    }

    /// Encodes everything recorded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization of the header fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = serde_json::Map::new();
        if !self.user_metadata.is_empty() {
            header.insert(
                "__metadata__".to_string(),
                serde_json::to_value(&self.user_metadata)?,
            );
        }

        // BTreeMap iteration keeps tensor order and offsets deterministic.
        let mut raw_data = Vec::new();
        for (name, (data, shape)) in &self.tensors {
            let start = raw_data.len();
            for &value in data {
                raw_data.extend_from_slice(&value.to_le_bytes());
            }
            let meta = TensorMetadata {
                dtype: "F64".to_string(),
                shape: shape.clone(),
                data_offsets: [start, raw_data.len()],
            };
            header.insert(name.clone(), serde_json::to_value(&meta)?);
        }

        let metadata_json = serde_json::to_string(&header)?;
        let metadata_bytes = metadata_json.as_bytes();
        let metadata_len = metadata_bytes.len() as u64;

        let mut output = Vec::with_capacity(8 + metadata_bytes.len() + raw_data.len());
        output.extend_from_slice(&metadata_len.to_le_bytes());
        output.extend_from_slice(metadata_bytes);
        output.extend_from_slice(&raw_data);
        Ok(output)
    }

    /// Encodes and writes to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the file write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl Archive for SafeTensorsWriter {
    fn is_loading(&self) -> bool {
        false
    }

    fn scalar(&mut self, name: &str, value: &mut u64) -> Result<()> {
        self.user_metadata.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn matrix(&mut self, name: &str, shape: (usize, usize), value: &mut Matrix<f64>) -> Result<()> {
        let (rows, cols) = value.shape();
        if (rows, cols) != shape {
            return Err(NaiveBayesError::DimensionMismatch {
                expected: format!("{name} {}x{}", shape.0, shape.1),
                actual: format!("{rows}x{cols}"),
            });
        }
        self.tensors.insert(
            name.to_string(),
            (value.to_column_major(), vec![rows, cols]),
        );
        Ok(())
    }

    fn vector(&mut self, name: &str, len: usize, value: &mut Vector<f64>) -> Result<()> {
        if value.len() != len {
            return Err(NaiveBayesError::dimension_mismatch(name, len, value.len()));
        }
        self.tensors.insert(
            name.to_string(),
            (value.as_slice().to_vec(), vec![value.len()]),
        );
        Ok(())
    }
}

/// Archive that decodes `SafeTensors` bytes and fills visited fields.
#[derive(Debug, Clone)]
pub struct SafeTensorsReader {
    metadata: SafeTensorsMetadata,
    user_metadata: UserMetadata,
    raw_data: Vec<u8>,
}

impl SafeTensorsReader {
    /// Parses an in-memory `SafeTensors` buffer.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if the header is truncated or not valid JSON.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let metadata_len = reader::validate_and_read_header(&bytes)?;
        let (metadata, user_metadata) = reader::parse_metadata(&bytes, metadata_len)?;
        let raw_data = bytes[8 + metadata_len..].to_vec();
        Ok(Self {
            metadata,
            user_metadata,
            raw_data,
        })
    }

    /// Reads and parses a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't valid `SafeTensors`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Names of all stored tensors, sorted.
    #[must_use]
    pub fn tensor_names(&self) -> Vec<&str> {
        self.metadata.keys().map(String::as_str).collect()
    }

    /// Entries of the `__metadata__` section.
    #[must_use]
    pub fn user_metadata(&self) -> &UserMetadata {
        &self.user_metadata
    }

    /// Stored shape of a tensor, without decoding its data.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if the tensor is missing.
    pub fn tensor_shape(&self, name: &str) -> Result<&[usize]> {
        Ok(&self.tensor_metadata(name)?.shape)
    }

    fn tensor_metadata(&self, name: &str) -> Result<&TensorMetadata> {
        self.metadata
            .get(name)
            .ok_or_else(|| NaiveBayesError::format(format!("missing tensor '{name}'")))
    }

    /// Decodes a tensor, returning its values and shape.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if the tensor is missing or malformed.
    pub fn get_tensor(&self, name: &str) -> Result<(Vec<f64>, Vec<usize>)> {
        let meta = self.tensor_metadata(name)?;
        let expected = meta
            .shape
            .iter()
            .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| {
                NaiveBayesError::format(format!(
                    "tensor '{name}' shape {:?} overflows usize",
                    meta.shape
                ))
            })?;
        let values = extract_tensor(&self.raw_data, meta)?;
        if values.len() != expected {
            return Err(NaiveBayesError::format(format!(
                "tensor '{name}' has {} values, shape {:?} requires {expected}",
                values.len(),
                meta.shape
            )));
        }
        Ok((values, meta.shape.clone()))
    }
}

impl Archive for SafeTensorsReader {
    fn is_loading(&self) -> bool {
        true
    }

    fn scalar(&mut self, name: &str, value: &mut u64) -> Result<()> {
        let raw = self
            .user_metadata
            .get(name)
            .ok_or_else(|| NaiveBayesError::format(format!("missing scalar '{name}'")))?;
        *value = raw
            .parse()
            .map_err(|e| NaiveBayesError::format(format!("scalar '{name}' = {raw:?}: {e}")))?;
        Ok(())
    }

    fn matrix(&mut self, name: &str, shape: (usize, usize), value: &mut Matrix<f64>) -> Result<()> {
        let (rows, cols) = shape;
        let stored = self.tensor_shape(name)?;
        if stored != [rows, cols] {
            return Err(NaiveBayesError::format(format!(
                "tensor '{name}' has shape {stored:?}, expected [{rows}, {cols}]"
            )));
        }
        let (data, _) = self.get_tensor(name)?;
        *value = Matrix::from_column_major(rows, cols, &data).map_err(NaiveBayesError::format)?;
        Ok(())
    }

    fn vector(&mut self, name: &str, len: usize, value: &mut Vector<f64>) -> Result<()> {
        let stored = self.tensor_shape(name)?;
        if stored != [len] {
            return Err(NaiveBayesError::format(format!(
                "tensor '{name}' has shape {stored:?}, expected [{len}]"
            )));
        }
        let (data, _) = self.get_tensor(name)?;
        *value = Vector::from_vec(data);
        Ok(())
    }
}

#[cfg(test)]
#[path = "safetensors_tests.rs"]
mod tests;
