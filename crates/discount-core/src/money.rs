//! # Money Module
//!
//! Converts between the structured wire amount (`currency_code`, `units`,
//! `nanos`) and a single signed integer of nanos used for arithmetic.
//!
//! ## Why Integer Nanos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Nanos                                            │
//! │    $12.50  = { units: 12, nanos: 500_000_000 }                          │
//! │            = 12_500_000_000 nanos (one i64)                             │
//! │                                                                         │
//! │  Every discount is computed on that one integer and then split back    │
//! │  into units + nanos. Same input, same output, every time.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use discount_core::money::{Money, NanoAmount};
//!
//! let total = Money::new("USD", 12, 500_000_000);
//! let nanos = total.to_nanos().unwrap();
//! assert_eq!(nanos, NanoAmount::from_nanos(12_500_000_000));
//!
//! let back = Money::from_nanos("USD", nanos);
//! assert_eq!(back, total);
//!
//! // Beyond ~9.22e9 units there is no i64 nano representation
//! assert_eq!(Money::new("USD", 10_000_000_000, 0).to_nanos(), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::types::DiscountRate;
use crate::NANOS_PER_UNIT;

// =============================================================================
// NanoAmount
// =============================================================================

/// A signed amount of currency in nanos (1e-9 of a unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: carts can arrive with negative totals and must still
///   be echoed back faithfully
/// - **No currency**: the currency travels separately, this is only the
///   magnitude used inside one evaluation
/// - **Checked conversions**: a `units` value with no i64 nano
///   representation yields `None`, never a clamped or wrapped amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NanoAmount(i64);

impl NanoAmount {
    /// Zero nanos.
    pub const ZERO: NanoAmount = NanoAmount(0);

    /// Creates an amount from a raw nano count.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        NanoAmount(nanos)
    }

    /// Creates an amount from whole currency units.
    ///
    /// Returns `None` when `units * 1e9` does not fit in an i64.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::NanoAmount;
    ///
    /// assert_eq!(NanoAmount::from_units(100).map(|a| a.nanos()), Some(100_000_000_000));
    /// assert_eq!(NanoAmount::from_units(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Option<Self> {
        match units.checked_mul(NANOS_PER_UNIT) {
            Some(nanos) => Some(NanoAmount(nanos)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: NanoAmount) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(nanos) => Some(NanoAmount(nanos)),
            None => None,
        }
    }

    /// Returns the raw nano count.
    #[inline]
    pub const fn nanos(&self) -> i64 {
        self.0
    }

    /// Checks if the amount is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the amount is strictly less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `self * rate`, truncated toward zero.
    ///
    /// ## Implementation
    /// `amount * bps / 10_000` in i128 so large totals cannot overflow.
    /// Integer division truncates toward zero, so identical inputs always
    /// produce identical discounts.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::NanoAmount;
    /// use discount_core::types::DiscountRate;
    ///
    /// let total = NanoAmount::from_nanos(100_000_000_000);
    /// let off = total.apply_rate(DiscountRate::from_bps(1000)); // 10%
    /// assert_eq!(off, NanoAmount::from_nanos(10_000_000_000));
    ///
    /// // 10% of 5 nanos is 0.5 nanos: truncated to 0
    /// assert_eq!(NanoAmount::from_nanos(5).apply_rate(DiscountRate::from_bps(1000)).nanos(), 0);
    /// ```
    pub fn apply_rate(&self, rate: DiscountRate) -> NanoAmount {
        let scaled = i128::from(self.0) * i128::from(rate.bps()) / i128::from(DiscountRate::MAX_BPS);
        // |scaled| <= |self| because bps <= MAX_BPS, so it always fits.
        NanoAmount(i64::try_from(scaled).unwrap_or(self.0))
    }
}

impl Add for NanoAmount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        NanoAmount(self.0.saturating_add(other.0))
    }
}

impl Sub for NanoAmount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        NanoAmount(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Money
// =============================================================================

/// A currency amount as it travels on the wire.
///
/// `value = units + nanos / 1e9`. In normalized form `nanos` lies in
/// `-999_999_999..=999_999_999` and has the same sign as `units` (or one of
/// them is zero).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 code, e.g. "USD". May be empty on input.
    pub currency_code: String,

    /// Whole units of the currency.
    pub units: i64,

    /// Fractional part in nanos.
    pub nanos: i32,
}

impl Money {
    /// Creates a Money value from its parts.
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Money {
            currency_code: currency_code.into(),
            units,
            nanos,
        }
    }

    /// Returns a zero amount in the given currency.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::Money;
    ///
    /// let zero = Money::zero("EUR");
    /// assert_eq!((zero.units, zero.nanos), (0, 0));
    /// assert_eq!(zero.currency_code, "EUR");
    /// ```
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Money::new(currency_code, 0, 0)
    }

    /// Splits a nano amount back into units and nanos.
    ///
    /// ## Normalization
    /// Uses floor (Euclidean) division, so the nanos part is always in
    /// `0..1_000_000_000` and the units part absorbs the sign:
    /// ```text
    ///    3_500_000_000  →  { units:  3, nanos: 500_000_000 }
    ///   -1_500_000_000  →  { units: -2, nanos: 500_000_000 }
    /// ```
    /// `units * 1e9 + nanos` always reproduces the input exactly.
    pub fn from_nanos(currency_code: impl Into<String>, amount: NanoAmount) -> Self {
        let units = amount.nanos().div_euclid(NANOS_PER_UNIT);
        let nanos = amount.nanos().rem_euclid(NANOS_PER_UNIT);
        Money {
            currency_code: currency_code.into(),
            units,
            // rem_euclid keeps this in 0..NANOS_PER_UNIT
            nanos: i32::try_from(nanos).unwrap_or_default(),
        }
    }

    /// Collapses units and nanos into a single nano amount.
    ///
    /// Returns `None` when the value lies outside the i64 nano range
    /// (roughly ±9.22e9 units).
    #[inline]
    pub fn to_nanos(&self) -> Option<NanoAmount> {
        NanoAmount::from_units(self.units)?.checked_add(NanoAmount::from_nanos(i64::from(self.nanos)))
    }

    /// Checks that nanos are in range and share the sign of units.
    pub fn is_normalized(&self) -> bool {
        let in_range = i64::from(self.nanos).abs() < NANOS_PER_UNIT;
        let same_sign = (self.units >= 0 && self.nanos >= 0) || (self.units <= 0 && self.nanos <= 0);
        in_range && same_sign
    }
}

/// Nano amount of an optional Money. Absent amounts count as zero;
/// unrepresentable ones are `None`.
///
/// ## Example
/// ```rust
/// use discount_core::money::{nanos_from_money, Money, NanoAmount};
///
/// assert_eq!(nanos_from_money(None), Some(NanoAmount::ZERO));
/// assert_eq!(
///     nanos_from_money(Some(&Money::new("USD", 3, 500_000_000))),
///     Some(NanoAmount::from_nanos(3_500_000_000))
/// );
/// ```
pub fn nanos_from_money(money: Option<&Money>) -> Option<NanoAmount> {
    match money {
        Some(money) => money.to_nanos(),
        None => Some(NanoAmount::ZERO),
    }
}

/// Log-friendly rendering: `USD 12.500000000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // i128 so floor-normalized negatives ({-2, 500_000_000}) print as -1.5
        let total = i128::from(self.units) * i128::from(NANOS_PER_UNIT) + i128::from(self.nanos);
        let sign = if total < 0 { "-" } else { "" };
        let magnitude = total.unsigned_abs();
        let per_unit = u128::from(NANOS_PER_UNIT.unsigned_abs());
        write!(
            f,
            "{} {}{}.{:09}",
            self.currency_code,
            sign,
            magnitude / per_unit,
            magnitude % per_unit
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
