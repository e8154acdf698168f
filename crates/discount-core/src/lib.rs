//! # discount-core: Pure Discount Evaluation
//!
//! This crate decides whether a discount code applies to a cart total and,
//! if it does, how much comes off. Everything here is a pure function with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Discount Code Service                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Order pipeline (checkout, cart service)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ gRPC ApplyDiscount                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/discount-service (tonic)                   │   │
//! │  │          proto <-> domain conversion, health, logging           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ discount-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ validation│  │  catalog  │  │ evaluator │  │   │
//! │  │   │   Money   │  │  request  │  │   codes   │  │  policy   │  │   │
//! │  │   │NanoAmount │  │  checks   │  │ thresholds│  │  result   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Request, result, error code, rate and rule types
//! - [`money`] - Money codec over integer nanos (no floating point!)
//! - [`validation`] - Request and catalog input validation
//! - [`catalog`] - Discount code lookup (`DiscountCatalog` trait)
//! - [`evaluator`] - The decision tree that produces a `DiscountResult`
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use discount_core::{DiscountEvaluator, DiscountErrorCode, DiscountRequest, Money, StaticCatalog};
//!
//! let evaluator = DiscountEvaluator::new(Arc::new(StaticCatalog::builtin()));
//! let request = DiscountRequest::new("SAVE10", Money::new("USD", 100, 0));
//!
//! let result = evaluator.evaluate(Some(&request));
//! assert_eq!(result.error_code, DiscountErrorCode::None);
//! assert_eq!(result.discount_amount, Money::new("USD", 10, 0));
//! assert_eq!(result.final_total, Money::new("USD", 90, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{DiscountCatalog, StaticCatalog};
pub use error::{CoreError, CoreResult, ValidationError};
pub use evaluator::DiscountEvaluator;
pub use money::{Money, NanoAmount};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when the request carries none.
///
/// Only consulted when no currency can be inferred from the cart total,
/// including the fully invalid request case.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Number of nanos in one whole currency unit.
pub const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// Maximum accepted length of a discount code.
pub const MAX_CODE_LENGTH: usize = 64;
