//! Generated gRPC code.
//!
//! This module includes the Rust code generated from `proto/discount_code.proto`
//! and `proto/health.proto` by `build.rs`.
//!
//! ## Services Available
//! - `DiscountCodeService` - ApplyDiscount
//! - `Health` - standard gRPC health checks (Check, Watch)
//!
//! `FILE_DESCRIPTOR_SET` covers both files and is served over reflection.

/// `discountcode.v1` messages and service stubs.
pub mod discount {
    tonic::include_proto!("discountcode.v1");
}

/// `grpc.health.v1` messages and service stubs.
pub mod health {
    tonic::include_proto!("grpc.health.v1");
}

/// Encoded descriptors for every compiled proto.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("discount_descriptor");

/// Fully-qualified gRPC name of the discount service, as reported by health checks.
pub const DISCOUNT_SERVICE_NAME: &str = "discountcode.v1.DiscountCodeService";
