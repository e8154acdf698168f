//! # Discount Evaluator
//!
//! The decision tree behind `ApplyDiscount`.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(request)                                                      │
//! │       │                                                                 │
//! │       ├── request / cart total missing, code blank                      │
//! │       │        → INVALID          (zero, zero, default currency)        │
//! │       │                                                                 │
//! │       ├── total outside the i64 nano range                              │
//! │       │        → INVALID          (zero, cart total as sent)            │
//! │       │                                                                 │
//! │       ├── total <= 0                                                    │
//! │       │        → NOT_APPLICABLE   (zero, total)                         │
//! │       │                                                                 │
//! │       ├── code unknown                                                  │
//! │       │        → INVALID          (zero, total)                         │
//! │       │                                                                 │
//! │       ├── total < code minimum                                          │
//! │       │        → NOT_APPLICABLE   (zero, total)                         │
//! │       │                                                                 │
//! │       └── otherwise                                                     │
//! │                → NONE             (total × rate, total − discount)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every branch returns a fully populated [`DiscountResult`]; nothing here
//! can fail.

use std::fmt;
use std::sync::Arc;

use crate::catalog::DiscountCatalog;
use crate::money::nanos_from_money;
use crate::types::{DiscountErrorCode, DiscountRequest, DiscountResult};
use crate::validation::validate_request;
use crate::DEFAULT_CURRENCY;

/// Stateless discount evaluator.
///
/// Cheap to clone and safe to share across tasks: the only field besides
/// the fallback currency is an `Arc` to an immutable catalog.
#[derive(Clone)]
pub struct DiscountEvaluator {
    catalog: Arc<dyn DiscountCatalog>,
    default_currency: String,
}

impl DiscountEvaluator {
    /// Creates an evaluator that falls back to USD.
    pub fn new(catalog: Arc<dyn DiscountCatalog>) -> Self {
        DiscountEvaluator {
            catalog,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Overrides the fallback currency.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Currency used when the request carries none.
    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Evaluates a discount request.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use discount_core::{DiscountErrorCode, DiscountEvaluator, DiscountRequest, Money, StaticCatalog};
    ///
    /// let evaluator = DiscountEvaluator::new(Arc::new(StaticCatalog::builtin()));
    ///
    /// // SAVE20 needs at least 100.00
    /// let request = DiscountRequest::new("SAVE20", Money::new("USD", 90, 0));
    /// let result = evaluator.evaluate(Some(&request));
    /// assert_eq!(result.error_code, DiscountErrorCode::NotApplicable);
    /// assert_eq!(result.final_total, Money::new("USD", 90, 0));
    /// ```
    pub fn evaluate(&self, request: Option<&DiscountRequest>) -> DiscountResult {
        let request = match validate_request(request) {
            Ok(valid) => valid,
            Err(_) => return DiscountResult::invalid_request(&self.default_currency),
        };

        let currency = if request.cart_total.currency_code.is_empty() {
            self.default_currency.as_str()
        } else {
            request.cart_total.currency_code.as_str()
        };

        let total = match nanos_from_money(Some(request.cart_total)) {
            Some(total) => total,
            None => return DiscountResult::out_of_range(currency, request.cart_total),
        };
        if !total.is_positive() {
            return DiscountResult::rejected(currency, total, DiscountErrorCode::NotApplicable);
        }

        let rule = match self.catalog.lookup(request.code) {
            Some(rule) => rule,
            None => return DiscountResult::rejected(currency, total, DiscountErrorCode::Invalid),
        };

        if !rule.meets_threshold(total) {
            return DiscountResult::rejected(currency, total, DiscountErrorCode::NotApplicable);
        }

        let discount = total.apply_rate(rule.rate);
        DiscountResult::applied(currency, discount, total - discount)
    }
}

impl fmt::Debug for DiscountEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountEvaluator")
            .field("default_currency", &self.default_currency)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::money::{Money, NanoAmount};
    use crate::types::{DiscountRate, DiscountRule};
    use crate::NANOS_PER_UNIT;

    fn evaluator() -> DiscountEvaluator {
        DiscountEvaluator::new(Arc::new(StaticCatalog::builtin()))
    }

    fn usd(units: i64) -> Money {
        Money::new("USD", units, 0)
    }

    fn expect(discount: Money, final_total: Money, error_code: DiscountErrorCode) -> DiscountResult {
        DiscountResult {
            discount_amount: discount,
            final_total,
            error_code,
        }
    }

    #[test]
    fn test_absent_request_is_invalid() {
        assert_eq!(
            evaluator().evaluate(None),
            expect(usd(0), usd(0), DiscountErrorCode::Invalid)
        );
    }

    #[test]
    fn test_missing_cart_total_is_invalid() {
        let request = DiscountRequest {
            discount_code: "SAVE10".to_string(),
            cart_total: None,
        };
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(0), usd(0), DiscountErrorCode::Invalid)
        );
    }

    #[test]
    fn test_empty_code_is_invalid_in_default_currency() {
        // Even with a EUR cart, malformed requests report the fallback currency
        let request = DiscountRequest::new("  ", Money::new("EUR", 50, 0));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(0), usd(0), DiscountErrorCode::Invalid)
        );
    }

    #[test]
    fn test_save10_applies_ten_percent() {
        let request = DiscountRequest::new("save10", usd(100));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(10), usd(90), DiscountErrorCode::None)
        );
    }

    #[test]
    fn test_reference_code_applies_ten_percent() {
        let request = DiscountRequest::new(" 94043 ", usd(100));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(10), usd(90), DiscountErrorCode::None)
        );
    }

    #[test]
    fn test_missing_currency_uses_default() {
        let request = DiscountRequest::new("SAVE10", Money::new("", 50, 0));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(5), usd(45), DiscountErrorCode::None)
        );
    }

    #[test]
    fn test_configured_default_currency() {
        let evaluator = evaluator().with_default_currency("CAD");
        assert_eq!(evaluator.default_currency(), "CAD");

        let result = evaluator.evaluate(Some(&DiscountRequest::new("SAVE10", Money::new("", 50, 0))));
        assert_eq!(result.final_total, Money::new("CAD", 45, 0));

        let result = evaluator.evaluate(None);
        assert_eq!(result.final_total, Money::zero("CAD"));
    }

    #[test]
    fn test_save20_below_threshold_not_applicable() {
        let request = DiscountRequest::new("SAVE20", usd(90));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(0), usd(90), DiscountErrorCode::NotApplicable)
        );
    }

    #[test]
    fn test_save20_one_unit_below_threshold() {
        let request = DiscountRequest::new("SAVE20", usd(99));
        let result = evaluator().evaluate(Some(&request));
        assert_eq!(result.error_code, DiscountErrorCode::NotApplicable);
        assert_eq!(result.final_total, usd(99));
    }

    #[test]
    fn test_save20_at_threshold_applies() {
        let request = DiscountRequest::new("SAVE20", usd(100));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(20), usd(80), DiscountErrorCode::None)
        );
    }

    #[test]
    fn test_unknown_code_is_invalid_with_total_passed_through() {
        let request = DiscountRequest::new("NOPE", Money::new("EUR", 100, 250_000_000));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(
                Money::zero("EUR"),
                Money::new("EUR", 100, 250_000_000),
                DiscountErrorCode::Invalid
            )
        );
    }

    #[test]
    fn test_zero_total_not_applicable() {
        let request = DiscountRequest::new("SAVE10", usd(0));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(0), usd(0), DiscountErrorCode::NotApplicable)
        );
    }

    #[test]
    fn test_negative_total_not_applicable() {
        let request = DiscountRequest::new("SAVE10", Money::new("USD", -1, -500_000_000));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(
                usd(0),
                Money::new("USD", -2, 500_000_000),
                DiscountErrorCode::NotApplicable
            )
        );
    }

    #[test]
    fn test_total_beyond_nano_range_is_invalid_and_echoed() {
        let evaluator = evaluator();
        let huge = Money::new("USD", 10_000_000_000, 0);

        // Known and unknown codes alike: no clamped arithmetic, total echoed as sent
        for code in ["NOPE", "SAVE10", "SAVE20"] {
            let result = evaluator.evaluate(Some(&DiscountRequest::new(code, huge.clone())));
            assert_eq!(
                result,
                expect(usd(0), huge.clone(), DiscountErrorCode::Invalid),
                "{code}"
            );
        }

        let negative = Money::new("", -10_000_000_000, -1);
        let result = evaluator.evaluate(Some(&DiscountRequest::new("SAVE10", negative)));
        assert_eq!(
            result,
            expect(usd(0), Money::new("USD", -10_000_000_000, -1), DiscountErrorCode::Invalid)
        );
    }

    #[test]
    fn test_largest_representable_total_applies() {
        let max = Money::new("USD", 9_223_372_036, 854_775_807);
        let result = evaluator().evaluate(Some(&DiscountRequest::new("SAVE10", max.clone())));
        assert!(result.is_applied());
        let sum = result.discount_amount.to_nanos().unwrap() + result.final_total.to_nanos().unwrap();
        assert_eq!(Some(sum), max.to_nanos());
    }

    #[test]
    fn test_non_positive_total_checked_before_code() {
        // An unknown code on an empty cart is NOT_APPLICABLE, not INVALID
        let request = DiscountRequest::new("NOPE", usd(0));
        let result = evaluator().evaluate(Some(&request));
        assert_eq!(result.error_code, DiscountErrorCode::NotApplicable);
    }

    #[test]
    fn test_truncates_sub_nano_discount() {
        let request = DiscountRequest::new("SAVE10", Money::new("USD", 0, 5));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(usd(0), Money::new("USD", 0, 5), DiscountErrorCode::None)
        );
    }

    #[test]
    fn test_fractional_total() {
        // 10% of 19.99 = 1.999
        let request = DiscountRequest::new("SAVE10", Money::new("USD", 19, 990_000_000));
        assert_eq!(
            evaluator().evaluate(Some(&request)),
            expect(
                Money::new("USD", 1, 999_000_000),
                Money::new("USD", 17, 991_000_000),
                DiscountErrorCode::None
            )
        );
    }

    #[test]
    fn test_discount_plus_final_equals_total() {
        let evaluator = evaluator();
        let totals = [
            1,
            7,
            999_999_999,
            NANOS_PER_UNIT,
            33_333_333_333,
            100 * NANOS_PER_UNIT,
            123_456_789_012_345,
        ];
        for code in ["SAVE10", "SAVE20", "94043"] {
            for nanos in totals {
                let total = Money::from_nanos("USD", NanoAmount::from_nanos(nanos));
                let result = evaluator.evaluate(Some(&DiscountRequest::new(code, total.clone())));
                if result.is_applied() {
                    let sum = result.discount_amount.to_nanos().unwrap()
                        + result.final_total.to_nanos().unwrap();
                    assert_eq!(Some(sum), total.to_nanos(), "{code} on {total}");
                } else {
                    assert_eq!(result.final_total, total);
                }
            }
        }
    }

    #[test]
    fn test_injected_catalog() {
        let catalog = StaticCatalog::from_rules([(
            "HALF",
            DiscountRule::new(DiscountRate::from_percent(50))
                .with_minimum(NanoAmount::from_units(10).unwrap()),
        )])
        .unwrap();
        let evaluator = DiscountEvaluator::new(Arc::new(catalog));

        let applied = evaluator.evaluate(Some(&DiscountRequest::new("half", usd(10))));
        assert_eq!(applied, expect(usd(5), usd(5), DiscountErrorCode::None));

        let builtin_code = evaluator.evaluate(Some(&DiscountRequest::new("SAVE10", usd(10))));
        assert_eq!(builtin_code.error_code, DiscountErrorCode::Invalid);
    }

    #[test]
    fn test_same_input_same_output() {
        let request = DiscountRequest::new("SAVE20", Money::new("USD", 321, 123_456_789));
        let evaluator = evaluator();
        let first = evaluator.evaluate(Some(&request));
        for _ in 0..10 {
            assert_eq!(evaluator.evaluate(Some(&request)), first);
        }
    }
}
