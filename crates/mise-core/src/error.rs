//! Error types for mise-core
//!
//! Every failure is reported synchronously at the point of detection:
//! - Data validation (missing or malformed feature data)
//! - Invalid parameters (bad `k`, bad query inputs)
//! - Querying an empty index
//! - File I/O and configuration problems

use mise_io::IoError;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for mise operations
#[derive(Error, Debug)]
pub enum MiseError {
    /// Malformed or missing input data
    #[error("Data validation failed: {message}")]
    DataValidation { message: String },

    /// Bad `k` or query input
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// The recommender was built over zero recipes
    #[error("Cannot query an index built over zero recipes")]
    EmptyIndex,

    /// Reading the source table failed
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl MiseError {
    pub(crate) fn data_validation(message: impl Into<String>) -> Self {
        MiseError::DataValidation {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        MiseError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for mise operations
pub type MiseResult<T> = Result<T, MiseError>;

/// Validation utilities
pub mod validation {
    use super::*;
    use crate::schema::Bounds;

    /// Validate the neighbor count against the number of indexed recipes
    ///
    /// `k` must be positive; it may not exceed `n` unless the table is empty,
    /// in which case the emptiness surfaces as `EmptyIndex` on query.
    pub fn validate_k(k: usize, n: usize) -> MiseResult<()> {
        if k == 0 {
            return Err(MiseError::invalid_parameter("k", "must be greater than zero"));
        }
        if n > 0 && k > n {
            return Err(MiseError::invalid_parameter(
                "k",
                format!("{} exceeds the number of recipes ({})", k, n),
            ));
        }
        Ok(())
    }

    /// Validate a query scalar is finite and inside its documented bounds
    pub fn validate_query_value(name: &str, value: f64, bounds: Bounds) -> MiseResult<()> {
        if !value.is_finite() {
            return Err(MiseError::invalid_parameter(name, "must be a finite number"));
        }
        if !bounds.contains(value) {
            return Err(MiseError::invalid_parameter(
                name,
                format!("{} is outside the valid range {}", value, bounds),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Bounds;

    #[test]
    fn test_data_validation_display() {
        let err = MiseError::data_validation("column 'minutes' has a missing value");
        assert!(err.to_string().contains("minutes"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = MiseError::invalid_parameter("k", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'k': must be greater than zero"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: MiseError = IoError::ColumnNotFound("minutes".to_string()).into();
        assert!(matches!(err, MiseError::Io(_)));
    }

    #[test]
    fn test_validate_k() {
        assert!(validation::validate_k(1, 3).is_ok());
        assert!(validation::validate_k(3, 3).is_ok());
        assert!(validation::validate_k(5, 0).is_ok());
        assert!(validation::validate_k(0, 3).is_err());
        assert!(validation::validate_k(4, 3).is_err());
    }

    #[test]
    fn test_validate_query_value() {
        let bounds = Bounds::new(0.0, 100.0);
        assert!(validation::validate_query_value("desired_complexity", 50.0, bounds).is_ok());
        assert!(validation::validate_query_value("desired_complexity", 100.0, bounds).is_ok());
        assert!(validation::validate_query_value("desired_complexity", 100.5, bounds).is_err());
        assert!(validation::validate_query_value("desired_complexity", f64::NAN, bounds).is_err());
    }
}
