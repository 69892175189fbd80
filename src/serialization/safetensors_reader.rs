use super::{SafeTensorsMetadata, TensorMetadata, UserMetadata};
use crate::error::{NaiveBayesError, Result};

pub(super) fn validate_and_read_header(bytes: &[u8]) -> Result<usize> {
    if bytes.len() < 8 {
        return Err(NaiveBayesError::format(format!(
            "file is {} bytes, need at least 8 bytes for header",
            bytes.len()
        )));
    }

    let mut header_bytes = [0u8; 8];
    header_bytes.copy_from_slice(&bytes[0..8]);
    let metadata_len = u64::from_le_bytes(header_bytes);
    let metadata_len = usize::try_from(metadata_len)
        .map_err(|_| NaiveBayesError::format("metadata length overflows usize"))?;

    if metadata_len == 0 {
        return Err(NaiveBayesError::format("metadata length is 0"));
    }

    if metadata_len > bytes.len() - 8 {
        return Err(NaiveBayesError::format(format!(
            "metadata length {metadata_len} exceeds file size"
        )));
    }

    Ok(metadata_len)
}

pub(super) fn parse_metadata(
    bytes: &[u8],
    metadata_len: usize,
) -> Result<(SafeTensorsMetadata, UserMetadata)> {
    let metadata_json = &bytes[8..8 + metadata_len];
    let metadata_str = std::str::from_utf8(metadata_json)
        .map_err(|e| NaiveBayesError::format(format!("metadata is not valid UTF-8: {e}")))?;

    let raw_metadata: serde_json::Value = serde_json::from_str(metadata_str)
        .map_err(|e| NaiveBayesError::format(format!("JSON parsing failed: {e}")))?;

    let serde_json::Value::Object(map) = raw_metadata else {
        return Err(NaiveBayesError::format("header is not a JSON object"));
    };

    let mut metadata = SafeTensorsMetadata::new();
    let mut user_metadata = UserMetadata::new();

    for (key, value) in map {
        if key == "__metadata__" {
            extract_user_metadata(value, &mut user_metadata);
            continue;
        }
        if key.starts_with("__") {
            continue;
        }
        let tensor_meta = serde_json::from_value::<TensorMetadata>(value)
            .map_err(|e| NaiveBayesError::format(format!("tensor '{key}': {e}")))?;
        metadata.insert(key, tensor_meta);
    }

    Ok((metadata, user_metadata))
}

/// Extracts string key-value pairs from a `__metadata__` JSON object.
fn extract_user_metadata(value: serde_json::Value, user_metadata: &mut UserMetadata) {
    let serde_json::Value::Object(meta_map) = value else {
        return;
    };
    for (mk, mv) in meta_map {
        if let serde_json::Value::String(s) = mv {
            user_metadata.insert(mk, s);
        }
    }
}

/// Extracts a tensor from raw `SafeTensors` data as `f64` values.
///
/// `F32` tensors are widened.
///
/// # Errors
///
/// Returns an error if:
/// - Data offsets are invalid
/// - Data size doesn't match dtype requirements
/// - Unsupported dtype
pub fn extract_tensor(raw_data: &[u8], tensor_meta: &TensorMetadata) -> Result<Vec<f64>> {
    let [start, end] = tensor_meta.data_offsets;

    if end > raw_data.len() {
        return Err(NaiveBayesError::format(format!(
            "invalid data offset: end={end} exceeds data size={}",
            raw_data.len()
        )));
    }
    if start > end {
        return Err(NaiveBayesError::format(format!(
            "invalid data offset: start={start} > end={end}"
        )));
    }

    let tensor_bytes = &raw_data[start..end];
    match tensor_meta.dtype.as_str() {
        "F64" => extract_f64(tensor_bytes),
        "F32" => extract_f32(tensor_bytes),
        other => Err(NaiveBayesError::format(format!(
            "unsupported dtype: {other}. Supported: F64, F32"
        ))),
    }
}

fn extract_f64(tensor_bytes: &[u8]) -> Result<Vec<f64>> {
    if tensor_bytes.len() % 8 != 0 {
        return Err(NaiveBayesError::format(format!(
            "F64 tensor data size {} is not a multiple of 8 bytes",
            tensor_bytes.len()
        )));
    }
    Ok(tensor_bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect())
}

fn extract_f32(tensor_bytes: &[u8]) -> Result<Vec<f64>> {
    if tensor_bytes.len() % 4 != 0 {
        return Err(NaiveBayesError::format(format!(
            "F32 tensor data size {} is not a multiple of 4 bytes",
            tensor_bytes.len()
        )));
    }
    Ok(tensor_bytes
        .chunks_exact(4)
        .map(|chunk| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            f64::from(f32::from_le_bytes(bytes))
        })
        .collect())
}
