//! # Validation Module
//!
//! Checks that run before any discount logic.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service startup                                              │
//! │  ├── validate_discount_code  (catalog keys)                            │
//! │  └── validate_rate_bps       (catalog rates)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Every ApplyDiscount call                                     │
//! │  └── validate_request  ← request present, cart total present,          │
//! │                          code not blank                                │
//! │                                                                         │
//! │  A failed Layer 2 check becomes DiscountErrorCode::Invalid.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DiscountRate, DiscountRequest};
use crate::MAX_CODE_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A request that passed [`validate_request`].
///
/// Borrows from the original request; the code is already trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest<'a> {
    /// Discount code without surrounding whitespace. Never empty.
    pub code: &'a str,

    /// The cart total, guaranteed present.
    pub cart_total: &'a Money,
}

// =============================================================================
// Request Validation
// =============================================================================

/// Validates an incoming discount request.
///
/// ## Rules
/// - The request must be present
/// - The cart total must be present
/// - The discount code must not be blank after trimming
///
/// ## Example
/// ```rust
/// use discount_core::validation::validate_request;
/// use discount_core::{DiscountRequest, Money};
///
/// let request = DiscountRequest::new("  SAVE10 ", Money::new("USD", 50, 0));
/// let valid = validate_request(Some(&request)).unwrap();
/// assert_eq!(valid.code, "SAVE10");
///
/// assert!(validate_request(None).is_err());
/// ```
pub fn validate_request(request: Option<&DiscountRequest>) -> ValidationResult<ValidatedRequest<'_>> {
    let request = request.ok_or_else(|| ValidationError::Required {
        field: "request".to_string(),
    })?;

    let cart_total = request
        .cart_total
        .as_ref()
        .ok_or_else(|| ValidationError::Required {
            field: "cart_total".to_string(),
        })?;

    let code = request.discount_code.trim();
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "discount_code".to_string(),
        });
    }

    Ok(ValidatedRequest { code, cart_total })
}

// =============================================================================
// Catalog Validation
// =============================================================================

/// Validates a discount code before it is registered in a catalog.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most MAX_CODE_LENGTH (64) characters
/// - No whitespace inside the code
///
/// ## Returns
/// The trimmed code.
pub fn validate_discount_code(code: &str) -> ValidationResult<&str> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "discount_code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "discount_code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "discount_code".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(code)
}

/// Validates a discount rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(bps: u32) -> ValidationResult<DiscountRate> {
    if bps > DiscountRate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "rate_bps".to_string(),
            min: 0,
            max: i64::from(DiscountRate::MAX_BPS),
        });
    }

    Ok(DiscountRate::from_bps(bps))
}

// =============================================================================
// Unit Tests
// =============================================================================
