//! Health check gRPC service implementation.
//!
//! Implements `grpc.health.v1.Health` for load balancers and orchestrators.
//!
//! ## Status Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HealthReporter::new()  ──►  SERVING                                    │
//! │                                 │                                       │
//! │                     shutdown signal received                            │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                            NOT_SERVING  ──►  server drains and exits    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_stream::{wrappers::ReceiverStream, Stream};
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::proto::health::{
    health_check_response::ServingStatus, health_server::Health, HealthCheckRequest,
    HealthCheckResponse,
};
use crate::proto::DISCOUNT_SERVICE_NAME;
use crate::AppState;

/// Shared serving status, written by the server lifecycle and read by
/// health checks.
#[derive(Debug)]
pub struct HealthReporter {
    status: watch::Sender<ServingStatus>,
}

impl HealthReporter {
    /// Creates a reporter in the SERVING state.
    pub fn new() -> Self {
        let (status, _) = watch::channel(ServingStatus::Serving);
        HealthReporter { status }
    }

    /// Marks the service as serving.
    pub fn set_serving(&self) {
        self.set(ServingStatus::Serving);
    }

    /// Marks the service as not serving (used during shutdown).
    pub fn set_not_serving(&self) {
        self.set(ServingStatus::NotServing);
    }

    /// Current status.
    pub fn current(&self) -> ServingStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<ServingStatus> {
        self.status.subscribe()
    }

    fn set(&self, status: ServingStatus) {
        let previous = self.status.send_replace(status);
        if previous != status {
            info!(from = ?previous, to = ?status, "Health status changed");
        }
    }
}

impl Default for HealthReporter {
    fn default() -> Self {
        HealthReporter::new()
    }
}

/// Health service implementation.
pub struct HealthServiceImpl {
    state: Arc<AppState>,
}

impl HealthServiceImpl {
    /// Create a new health service.
    pub fn new(state: Arc<AppState>) -> Self {
        HealthServiceImpl { state }
    }
}

/// Services this process reports on. The empty name means the whole server.
fn is_known_service(service: &str) -> bool {
    service.is_empty() || service == DISCOUNT_SERVICE_NAME
}

fn response(status: ServingStatus) -> HealthCheckResponse {
    HealthCheckResponse {
        status: status as i32,
    }
}

#[tonic::async_trait]
impl Health for HealthServiceImpl {
    /// Simple health check.
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let req = request.into_inner();

        if !is_known_service(&req.service) {
            return Err(ServiceError::UnknownService(req.service).into());
        }

        let status = self.state.health.current();
        debug!(service = %req.service, ?status, "Health check");
        Ok(Response::new(response(status)))
    }

    type WatchStream = Pin<Box<dyn Stream<Item = Result<HealthCheckResponse, Status>> + Send>>;

    /// Streams the current status, then every change.
    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let service = request.into_inner().service;
        let known = is_known_service(&service);
        let mut status_rx = self.state.health.subscribe();

        info!(service = %service, "Starting health watch stream");

        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            loop {
                let status = if known {
                    let current = *status_rx.borrow_and_update();
                    current
                } else {
                    ServingStatus::ServiceUnknown
                };

                if tx.send(Ok(response(status))).await.is_err() {
                    // Client disconnected
                    break;
                }

                if !known {
                    // Unknown services never change; hold the stream open
                    tx.closed().await;
                    break;
                }

                tokio::select! {
                    changed = status_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => break,
                }
            }

            info!(service = %service, "Health watch stream ended");
        });

        let output_stream = ReceiverStream::new(rx);
        Ok(Response::new(Box::pin(output_stream)))
    }
}
