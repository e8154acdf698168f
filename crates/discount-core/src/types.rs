//! # Domain Types
//!
//! The values that flow into and out of one discount evaluation.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐      evaluate()      ┌─────────────────────┐      │
//! │  │ DiscountRequest │ ───────────────────► │   DiscountResult    │      │
//! │  │  discount_code  │                      │   discount_amount   │      │
//! │  │  cart_total?    │                      │   final_total       │      │
//! │  └─────────────────┘                      │   error_code        │      │
//! │                                           └─────────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │  DiscountRate   │   │  DiscountRule   │   │ DiscountErrorCode   │   │
//! │  │  bps (u32)      │   │  rate           │   │  None               │   │
//! │  │  1000 = 10%     │   │  minimum_total? │   │  Invalid            │   │
//! │  └─────────────────┘   └─────────────────┘   │  NotApplicable      │   │
//! │                                              └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{Money, NanoAmount};

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount fraction in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%, 2000 bps = 20%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// 100%: the largest meaningful rate.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        DiscountRate(percent * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Discount Rule
// =============================================================================

/// What a known code grants.
///
/// The code itself is the catalog key and is not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    /// Fraction taken off the cart total.
    pub rate: DiscountRate,

    /// Smallest cart total the code accepts (inclusive). `None` = any
    /// positive total.
    pub minimum_total: Option<NanoAmount>,
}

impl DiscountRule {
    /// A rule with no minimum total.
    pub const fn new(rate: DiscountRate) -> Self {
        DiscountRule {
            rate,
            minimum_total: None,
        }
    }

    /// Requires the cart total to reach `minimum`.
    pub const fn with_minimum(self, minimum: NanoAmount) -> Self {
        DiscountRule {
            minimum_total: Some(minimum),
            ..self
        }
    }

    /// Checks whether `total` reaches this rule's threshold.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::NanoAmount;
    /// use discount_core::types::{DiscountRate, DiscountRule};
    ///
    /// let hundred = NanoAmount::from_nanos(100_000_000_000);
    /// let rule = DiscountRule::new(DiscountRate::from_percent(20)).with_minimum(hundred);
    /// assert!(rule.meets_threshold(hundred));
    /// assert!(!rule.meets_threshold(NanoAmount::from_nanos(99_000_000_000)));
    /// ```
    pub fn meets_threshold(&self, total: NanoAmount) -> bool {
        self.minimum_total.map_or(true, |minimum| total >= minimum)
    }
}

// =============================================================================
// Error Code
// =============================================================================

/// Outcome of one evaluation. Exactly one per result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountErrorCode {
    /// A discount was computed and applied.
    #[default]
    None,

    /// Malformed request, empty code, or unrecognized code.
    Invalid,

    /// Valid request but nothing to discount: non-positive total, or total
    /// below the code's threshold.
    NotApplicable,
}

impl fmt::Display for DiscountErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountErrorCode::None => write!(f, "NONE"),
            DiscountErrorCode::Invalid => write!(f, "INVALID"),
            DiscountErrorCode::NotApplicable => write!(f, "NOT_APPLICABLE"),
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// Input to one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscountRequest {
    /// Code as typed by the shopper. Surrounding whitespace is ignored.
    pub discount_code: String,

    /// Cart total. `None` when the caller left it out.
    pub cart_total: Option<Money>,
}

impl DiscountRequest {
    /// Creates a request with a cart total.
    pub fn new(discount_code: impl Into<String>, cart_total: Money) -> Self {
        DiscountRequest {
            discount_code: discount_code.into(),
            cart_total: Some(cart_total),
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// Output of one evaluation. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountResult {
    /// Amount taken off. Zero unless `error_code` is `None`.
    pub discount_amount: Money,

    /// Amount the shopper pays.
    pub final_total: Money,

    /// Outcome.
    pub error_code: DiscountErrorCode,
}

impl DiscountResult {
    /// Malformed request: zero everything in the fallback currency.
    pub fn invalid_request(default_currency: &str) -> Self {
        DiscountResult {
            discount_amount: Money::zero(default_currency),
            final_total: Money::zero(default_currency),
            error_code: DiscountErrorCode::Invalid,
        }
    }

    /// No discount; the total passes through unchanged.
    pub fn rejected(currency: &str, total: NanoAmount, error_code: DiscountErrorCode) -> Self {
        DiscountResult {
            discount_amount: Money::zero(currency),
            final_total: Money::from_nanos(currency, total),
            error_code,
        }
    }

    /// Cart total too large to evaluate: INVALID, with the request's
    /// amount echoed back as-is.
    pub fn out_of_range(currency: &str, cart_total: &Money) -> Self {
        DiscountResult {
            discount_amount: Money::zero(currency),
            final_total: Money::new(currency, cart_total.units, cart_total.nanos),
            error_code: DiscountErrorCode::Invalid,
        }
    }

    /// A discount was applied.
    pub fn applied(currency: &str, discount: NanoAmount, final_total: NanoAmount) -> Self {
        DiscountResult {
            discount_amount: Money::from_nanos(currency, discount),
            final_total: Money::from_nanos(currency, final_total),
            error_code: DiscountErrorCode::None,
        }
    }

    /// Checks if a discount was applied.
    #[inline]
    pub fn is_applied(&self) -> bool {
        self.error_code == DiscountErrorCode::None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_display() {
        assert_eq!(DiscountRate::from_percent(10).to_string(), "10.00%");
        assert_eq!(DiscountRate::from_bps(825).to_string(), "8.25%");
    }

    #[test]
    fn test_rule_without_minimum_accepts_anything() {
        let rule = DiscountRule::new(DiscountRate::from_percent(10));
        assert!(rule.meets_threshold(NanoAmount::from_nanos(1)));
    }

    #[test]
    fn test_rule_threshold_is_inclusive() {
        let hundred = NanoAmount::from_units(100).unwrap();
        let rule = DiscountRule::new(DiscountRate::from_percent(20)).with_minimum(hundred);
        assert!(rule.meets_threshold(hundred));
        assert!(!rule.meets_threshold(hundred - NanoAmount::from_nanos(1)));
    }

    #[test]
    fn test_error_code_serializes_like_the_wire_enum() {
        let json = serde_json::to_string(&DiscountErrorCode::NotApplicable).unwrap();
        assert_eq!(json, "\"NOT_APPLICABLE\"");
        assert_eq!(DiscountErrorCode::NotApplicable.to_string(), "NOT_APPLICABLE");
    }

    #[test]
    fn test_rejected_passes_total_through() {
        let result = DiscountResult::rejected(
            "EUR",
            NanoAmount::from_units(42).unwrap(),
            DiscountErrorCode::Invalid,
        );
        assert_eq!(result.discount_amount, Money::zero("EUR"));
        assert_eq!(result.final_total, Money::new("EUR", 42, 0));
        assert!(!result.is_applied());
    }

    #[test]
    fn test_out_of_range_echoes_cart_total() {
        let huge = Money::new("", 10_000_000_000, 5);
        let result = DiscountResult::out_of_range("USD", &huge);
        assert_eq!(result.error_code, DiscountErrorCode::Invalid);
        assert_eq!(result.discount_amount, Money::zero("USD"));
        assert_eq!(result.final_total, Money::new("USD", 10_000_000_000, 5));
    }
}
