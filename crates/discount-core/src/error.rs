//! # Error Types
//!
//! Domain-specific error types for discount-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  discount-core errors (this file)                                      │
//! │  ├── CoreError        - Catalog construction failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  discount-service errors (app crate)                                   │
//! │  ├── ConfigError      - Bad environment / codes file                   │
//! │  └── ServiceError     - Startup and transport failures                 │
//! │                                                                         │
//! │  NOTE: an evaluation never returns an error. Request validation        │
//! │  failures are folded into DiscountErrorCode::Invalid by the evaluator. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures while building a discount catalog.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The same code (case-insensitively) was registered twice.
    #[error("Discount code '{0}' is already registered")]
    DuplicateCode(String),

    /// A threshold below zero can never be meaningful.
    #[error("Minimum total for '{code}' must not be negative")]
    NegativeThreshold { code: String },

    /// The threshold has no nano representation.
    #[error("Minimum total for '{code}' is out of range: {units} units")]
    ThresholdOutOfRange { code: String, units: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateCode("SAVE10".to_string());
        assert_eq!(err.to_string(), "Discount code 'SAVE10' is already registered");

        let err = CoreError::ThresholdOutOfRange {
            code: "HUGE".to_string(),
            units: i64::MAX,
        };
        assert_eq!(
            err.to_string(),
            "Minimum total for 'HUGE' is out of range: 9223372036854775807 units"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "discount_code".to_string(),
        };
        assert_eq!(err.to_string(), "discount_code is required");

        let err = ValidationError::OutOfRange {
            field: "rate_bps".to_string(),
            min: 0,
            max: 10_000,
        };
        assert_eq!(err.to_string(), "rate_bps must be between 0 and 10000");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "discount_code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
