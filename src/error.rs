//! Error types for classifier operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for training, classification, and persistence.
///
/// # Examples
///
/// ```
/// use gaussian_nb::error::NaiveBayesError;
///
/// let err = NaiveBayesError::DimensionMismatch {
///     expected: "features=4".to_string(),
///     actual: "3".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum NaiveBayesError {
    /// Input dimensions don't match the model or each other.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A training label lies outside `[0, n_classes)`.
    InvalidLabel {
        /// Offending label
        label: usize,
        /// Number of classes the model was built with
        n_classes: usize,
    },

    /// Training input has no samples where at least one is required.
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Invalid or corrupt model archive.
    FormatError {
        /// Error description
        message: String,
    },
}

impl fmt::Display for NaiveBayesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaiveBayesError::DimensionMismatch { expected, actual } => {
                write!(f, "Matrix dimension mismatch: expected {expected}, got {actual}")
            }
            NaiveBayesError::InvalidLabel { label, n_classes } => {
                write!(
                    f,
                    "Invalid label {label}: labels must lie in [0, {n_classes})"
                )
            }
            NaiveBayesError::EmptyInput { context } => {
                write!(f, "Empty input: {context}")
            }
            NaiveBayesError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            NaiveBayesError::Io(e) => write!(f, "I/O error: {e}"),
            NaiveBayesError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            NaiveBayesError::FormatError { message } => {
                write!(f, "Invalid model format: {message}")
            }
        }
    }
}

impl std::error::Error for NaiveBayesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NaiveBayesError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NaiveBayesError {
    fn from(err: std::io::Error) -> Self {
        NaiveBayesError::Io(err)
    }
}

impl From<bincode::Error> for NaiveBayesError {
    fn from(err: bincode::Error) -> Self {
        NaiveBayesError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for NaiveBayesError {
    fn from(err: serde_json::Error) -> Self {
        NaiveBayesError::Serialization(err.to_string())
    }
}

impl NaiveBayesError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create a format error from any displayable message
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, NaiveBayesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = NaiveBayesError::DimensionMismatch {
            expected: "4x2".to_string(),
            actual: "3x2".to_string(),
        };
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(err.to_string().contains("4x2"));
        assert!(err.to_string().contains("3x2"));
    }

    #[test]
    fn test_invalid_label_display() {
        let err = NaiveBayesError::InvalidLabel {
            label: 7,
            n_classes: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("label 7"));
        assert!(msg.contains("[0, 3)"));
    }

    #[test]
    fn test_empty_input_helper() {
        let err = NaiveBayesError::empty_input("training batch");
        assert!(matches!(err, NaiveBayesError::EmptyInput { .. }));
        assert!(err.to_string().contains("training batch"));
    }

    #[test]
    fn test_invalid_hyperparameter_display() {
        let err = NaiveBayesError::InvalidHyperparameter {
            param: "n_classes".to_string(),
            value: "0".to_string(),
            constraint: ">0".to_string(),
        };
        assert!(err.to_string().contains("n_classes"));
        assert!(err.to_string().contains(">0"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = NaiveBayesError::dimension_mismatch("features", 4, 3);
        let msg = err.to_string();
        assert!(msg.contains("features=4"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_from_io_error() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NaiveBayesError = io_err.into();
        assert!(matches!(err, NaiveBayesError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_format_error_display() {
        let err = NaiveBayesError::format("missing tensor 'means'");
        assert!(err.to_string().contains("Invalid model format"));
        assert!(err.to_string().contains("means"));
    }

    #[test]
    fn test_error_source_other() {
        use std::error::Error;
        let err = NaiveBayesError::Serialization("bad".to_string());
        assert!(err.source().is_none());
    }
}
