//! gRPC service implementations.

pub mod discount_service;
pub mod health_service;
