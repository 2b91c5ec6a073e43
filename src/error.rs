//! Error types for the evaluation harness

use thiserror::Error;

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Main error type for the evaluation harness
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Cannot obtain predictions from non-trained model {0}")]
    ModelNotFitted(String),

    #[error("Inadmissible input data frame: expected columns {expected:?}, got {actual:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Must provide name of predicted variable, as multiple variables were predicted: {0:?}")]
    AmbiguousVariable(Vec<String>),

    #[error("No evaluation data present for '{name}'; known output variables: {known:?}")]
    UnknownVariable { name: String, known: Vec<String> },

    #[error("Model cannot be used for chained execution: input dim {input_dim} does not match output dim {output_dim}")]
    IncompatibleChain { input_dim: usize, output_dim: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for EvalError {
    fn from(err: polars::error::PolarsError) -> Self {
        EvalError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for EvalError {
    fn from(err: ndarray::ShapeError) -> Self {
        EvalError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvalError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_column_mismatch_names_both_sides() {
        let err = EvalError::ColumnMismatch {
            expected: vec!["a".to_string(), "b".to_string()],
            actual: vec!["b".to_string(), "a".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains(r#"["a", "b"]"#));
        assert!(msg.contains(r#"["b", "a"]"#));
    }

    #[test]
    fn test_error_from_serde() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: EvalError = json_err.into();
        assert!(matches!(err, EvalError::SerializationError(_)));
    }
}
