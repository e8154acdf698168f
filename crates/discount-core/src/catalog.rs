//! # Discount Catalog
//!
//! Maps a discount code to the [`DiscountRule`] it grants.
//!
//! The evaluator only sees the [`DiscountCatalog`] trait, so the in-memory
//! [`StaticCatalog`] can be swapped for a real catalog without touching the
//! evaluation logic.
//!
//! ## Reference Table
//! ```text
//! ┌──────────┬──────────┬─────────────────────────┐
//! │ code     │ discount │ minimum total (units)   │
//! ├──────────┼──────────┼─────────────────────────┤
//! │ 94043    │ 10%      │ none                    │
//! │ SAVE10   │ 10%      │ none                    │
//! │ SAVE20   │ 20%      │ 100                     │
//! └──────────┴──────────┴─────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::NanoAmount;
use crate::types::{DiscountRate, DiscountRule};
use crate::NANOS_PER_UNIT;

/// SAVE20 threshold: 100 units.
const SAVE20_MINIMUM: NanoAmount = NanoAmount::from_nanos(100 * NANOS_PER_UNIT);
use crate::validation::{validate_discount_code, validate_rate_bps};

/// Source of discount rules.
///
/// Implementations must be safe to share between concurrent evaluations.
pub trait DiscountCatalog: Send + Sync {
    /// Returns the rule for `code`, or `None` if the code is unknown.
    ///
    /// `code` arrives trimmed. Case handling is up to the implementation.
    fn lookup(&self, code: &str) -> Option<DiscountRule>;
}

/// In-memory catalog. Codes are matched case-insensitively (ASCII).
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    rules: HashMap<String, DiscountRule>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        StaticCatalog::default()
    }

    /// The reference code table.
    pub fn builtin() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            "94043".to_string(),
            DiscountRule::new(DiscountRate::from_percent(10)),
        );
        rules.insert(
            "SAVE10".to_string(),
            DiscountRule::new(DiscountRate::from_percent(10)),
        );
        rules.insert(
            "SAVE20".to_string(),
            DiscountRule::new(DiscountRate::from_percent(20)).with_minimum(SAVE20_MINIMUM),
        );
        StaticCatalog { rules }
    }

    /// Builds a catalog from `(code, rule)` pairs, rejecting the first bad one.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::catalog::{DiscountCatalog, StaticCatalog};
    /// use discount_core::types::{DiscountRate, DiscountRule};
    ///
    /// let catalog = StaticCatalog::from_rules([
    ///     ("WELCOME5", DiscountRule::new(DiscountRate::from_percent(5))),
    /// ]).unwrap();
    /// assert!(catalog.lookup("welcome5").is_some());
    /// ```
    pub fn from_rules<I, S>(rules: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, DiscountRule)>,
        S: AsRef<str>,
    {
        let mut catalog = StaticCatalog::new();
        for (code, rule) in rules {
            catalog.insert(code.as_ref(), rule)?;
        }
        Ok(catalog)
    }

    /// Registers a code.
    ///
    /// ## Errors
    /// - The code is blank, too long, or contains whitespace
    /// - The rate exceeds 100%
    /// - The minimum total is negative
    /// - The code is already registered (case-insensitively)
    pub fn insert(&mut self, code: &str, rule: DiscountRule) -> CoreResult<()> {
        let code = validate_discount_code(code)?;
        validate_rate_bps(rule.rate.bps())?;

        if rule.minimum_total.is_some_and(|minimum| minimum.is_negative()) {
            return Err(CoreError::NegativeThreshold {
                code: code.to_string(),
            });
        }

        let key = normalize(code);
        if self.rules.contains_key(&key) {
            return Err(CoreError::DuplicateCode(key));
        }

        self.rules.insert(key, rule);
        Ok(())
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Checks if no codes are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered codes in sorted order (upper-cased).
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl DiscountCatalog for StaticCatalog {
    fn lookup(&self, code: &str) -> Option<DiscountRule> {
        self.rules.get(&normalize(code)).copied()
    }
}

fn normalize(code: &str) -> String {
    code.to_ascii_uppercase()
}

// =============================================================================
// Unit Tests
// =============================================================================
