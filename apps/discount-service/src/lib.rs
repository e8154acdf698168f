//! # Discount Code Service
//!
//! gRPC server that evaluates discount codes for the order pipeline.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Discount Code Service                              │
//! │                                                                         │
//! │  grpc.reflection.v1.ServerReflection lists both services below.        │
//! │                                                                         │
//! │  ┌────────────────────────┐        ┌────────────────────────────────┐  │
//! │  │  DiscountCodeService   │        │  grpc.health.v1.Health         │  │
//! │  │                        │        │                                │  │
//! │  │ • ApplyDiscount        │        │ • Check                        │  │
//! │  │                        │        │ • Watch                        │  │
//! │  └───────────┬────────────┘        └───────────────┬────────────────┘  │
//! │              │                                     │                    │
//! │              ▼                                     ▼                    │
//! │  ┌────────────────────────┐        ┌────────────────────────────────┐  │
//! │  │  DiscountEvaluator     │        │  HealthReporter                │  │
//! │  │  (discount-core)       │        │  SERVING / NOT_SERVING         │  │
//! │  └────────────────────────┘        └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - gRPC server port (default: 7001)
//! - `BIND_ADDRESS` - listen address (default: 0.0.0.0)
//! - `DEFAULT_CURRENCY` - fallback currency (default: USD)
//! - `DISCOUNT_CODES_FILE` - TOML code table replacing the builtin one
//! - `LOG_LEVEL` - tracing filter (default: debug, `RUST_LOG` wins)
//! - `LOG_FORMAT` - `json` (default) or `pretty`

pub mod config;
pub mod error;
pub mod proto;
pub mod services;
pub mod telemetry;

use std::future::Future;
use std::sync::Arc;

use discount_core::{DiscountCatalog, DiscountEvaluator};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use crate::proto::discount::discount_code_service_server::DiscountCodeServiceServer;
use crate::proto::health::health_server::HealthServer;
use crate::proto::FILE_DESCRIPTOR_SET;
use crate::services::discount_service::DiscountServiceImpl;
use crate::services::health_service::{HealthReporter, HealthServiceImpl};

// Re-exports
pub use config::ServiceConfig;
pub use error::ServiceError;

/// Shared application state.
pub struct AppState {
    pub evaluator: DiscountEvaluator,
    pub health: HealthReporter,
}

impl AppState {
    /// Wires the evaluator to the given catalog and configured currency.
    pub fn new(config: &ServiceConfig, catalog: Arc<dyn DiscountCatalog>) -> Self {
        let evaluator =
            DiscountEvaluator::new(catalog).with_default_currency(config.default_currency.clone());
        AppState {
            evaluator,
            health: HealthReporter::new(),
        }
    }
}

/// Runs the gRPC server on `listener` until `shutdown` resolves.
///
/// Health flips to NOT_SERVING as soon as `shutdown` fires; in-flight
/// requests are then drained before this returns.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServiceError>
where
    F: Future<Output = ()> + Send,
{
    let discount_service = DiscountCodeServiceServer::new(DiscountServiceImpl::new(state.clone()));
    let health_service = HealthServer::new(HealthServiceImpl::new(state.clone()));
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    state.health.set_serving();

    let shutdown_state = state.clone();
    let shutdown = async move {
        shutdown.await;
        info!("Shutdown signal received, starting graceful shutdown...");
        shutdown_state.health.set_not_serving();
    };

    Server::builder()
        .add_service(discount_service)
        .add_service(health_service)
        .add_service(reflection_service)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;

    Ok(())
}
