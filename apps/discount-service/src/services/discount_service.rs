//! Discount gRPC service implementation.
//!
//! Thin adapter: proto request → domain request → evaluator → proto
//! response. All decisions live in `discount_core::DiscountEvaluator`.

use std::sync::Arc;

use discount_core::{DiscountErrorCode, DiscountRequest, DiscountResult, Money};
use tonic::{Request, Response, Status};
use tracing::info;

use crate::proto::discount::{
    discount_code_service_server::DiscountCodeService, ApplyDiscountRequest,
    ApplyDiscountResponse, DiscountErrorCode as ProtoErrorCode, Money as ProtoMoney,
};
use crate::AppState;

/// Discount service implementation.
pub struct DiscountServiceImpl {
    state: Arc<AppState>,
}

impl DiscountServiceImpl {
    /// Create a new discount service.
    pub fn new(state: Arc<AppState>) -> Self {
        DiscountServiceImpl { state }
    }
}

#[tonic::async_trait]
impl DiscountCodeService for DiscountServiceImpl {
    /// Evaluate a discount code against a cart total.
    ///
    /// Always `Ok`: invalid or inapplicable codes are reported through
    /// `error_code`, never as a gRPC status.
    async fn apply_discount(
        &self,
        request: Request<ApplyDiscountRequest>,
    ) -> Result<Response<ApplyDiscountResponse>, Status> {
        info!("[ApplyDiscount] received request");

        let req = DiscountRequest::from(request.into_inner());
        let result = self.state.evaluator.evaluate(Some(&req));

        info!(
            code = %req.discount_code.trim(),
            currency = %result.final_total.currency_code,
            error_code = %result.error_code,
            discount = %result.discount_amount,
            final_total = %result.final_total,
            "[ApplyDiscount] completed request"
        );

        Ok(Response::new(result.into()))
    }
}

// =============================================================================
// Proto <-> Domain Conversions
// =============================================================================

impl From<ProtoMoney> for Money {
    fn from(money: ProtoMoney) -> Self {
        Money::new(money.currency_code, money.units, money.nanos)
    }
}

impl From<Money> for ProtoMoney {
    fn from(money: Money) -> Self {
        ProtoMoney {
            currency_code: money.currency_code,
            units: money.units,
            nanos: money.nanos,
        }
    }
}

impl From<DiscountErrorCode> for ProtoErrorCode {
    fn from(code: DiscountErrorCode) -> Self {
        match code {
            DiscountErrorCode::None => ProtoErrorCode::None,
            DiscountErrorCode::Invalid => ProtoErrorCode::Invalid,
            DiscountErrorCode::NotApplicable => ProtoErrorCode::NotApplicable,
        }
    }
}

impl From<ApplyDiscountRequest> for DiscountRequest {
    fn from(request: ApplyDiscountRequest) -> Self {
        DiscountRequest {
            discount_code: request.discount_code,
            // An unset message field is an absent cart total
            cart_total: request.cart_total.map(Money::from),
        }
    }
}

impl From<DiscountResult> for ApplyDiscountResponse {
    fn from(result: DiscountResult) -> Self {
        ApplyDiscountResponse {
            discount_amount: Some(result.discount_amount.into()),
            final_total: Some(result.final_total.into()),
            error_code: ProtoErrorCode::from(result.error_code) as i32,
        }
    }
}
