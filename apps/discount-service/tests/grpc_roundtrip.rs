//! End-to-end tests: real TCP listener, generated tonic clients.

use std::net::SocketAddr;
use std::sync::Arc;

use discount_code_service::proto::discount::{
    discount_code_service_client::DiscountCodeServiceClient, ApplyDiscountRequest,
    DiscountErrorCode, Money,
};
use discount_code_service::proto::health::{
    health_check_response::ServingStatus, health_client::HealthClient, HealthCheckRequest,
};
use discount_code_service::proto::DISCOUNT_SERVICE_NAME;
use discount_code_service::{config, serve, AppState, ServiceConfig, ServiceError};
use discount_core::StaticCatalog;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::Code;
use tonic_reflection::pb::v1::{
    server_reflection_client::ServerReflectionClient,
    server_reflection_request::MessageRequest, server_reflection_response::MessageResponse,
    ServerReflectionRequest,
};

struct TestServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), ServiceError>>,
}

impl TestServer {
    async fn start(catalog: StaticCatalog) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(&ServiceConfig::default(), Arc::new(catalog)));
        let (shutdown, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve(listener, state.clone(), async {
            let _ = rx.await;
        }));

        TestServer {
            addr,
            state,
            shutdown,
            handle,
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    async fn stop(self) -> Arc<AppState> {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap().unwrap();
        self.state
    }
}

fn usd(units: i64, nanos: i32) -> Money {
    Money {
        currency_code: "USD".to_string(),
        units,
        nanos,
    }
}

#[tokio::test]
async fn apply_discount_over_tcp() {
    let server = TestServer::start(StaticCatalog::builtin()).await;
    let mut client = DiscountCodeServiceClient::connect(server.url()).await.unwrap();

    let applied = client
        .apply_discount(ApplyDiscountRequest {
            discount_code: " save20 ".to_string(),
            cart_total: Some(usd(125, 500_000_000)),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(applied.error_code(), DiscountErrorCode::None);
    assert_eq!(applied.discount_amount, Some(usd(25, 100_000_000)));
    assert_eq!(applied.final_total, Some(usd(100, 400_000_000)));

    let missing_total = client
        .apply_discount(ApplyDiscountRequest {
            discount_code: "SAVE10".to_string(),
            cart_total: None,
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(missing_total.error_code(), DiscountErrorCode::Invalid);
    assert_eq!(missing_total.final_total, Some(usd(0, 0)));

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn codes_file_catalog_replaces_builtin() {
    let catalog = config::parse_codes_toml(
        r#"
        [[codes]]
        code = "STAFF"
        rate_bps = 3000
        "#,
    )
    .unwrap();
    let server = TestServer::start(catalog).await;
    let mut client = DiscountCodeServiceClient::connect(server.url()).await.unwrap();

    let staff = client
        .apply_discount(ApplyDiscountRequest {
            discount_code: "staff".to_string(),
            cart_total: Some(usd(10, 0)),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(staff.error_code(), DiscountErrorCode::None);
    assert_eq!(staff.discount_amount, Some(usd(3, 0)));

    let builtin = client
        .apply_discount(ApplyDiscountRequest {
            discount_code: "SAVE10".to_string(),
            cart_total: Some(usd(10, 0)),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(builtin.error_code(), DiscountErrorCode::Invalid);
    assert_eq!(builtin.final_total, Some(usd(10, 0)));

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn reflection_lists_services_over_tcp() {
    let server = TestServer::start(StaticCatalog::builtin()).await;
    let channel = tonic::transport::Endpoint::new(server.url())
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut client = ServerReflectionClient::new(channel);

    let request = ServerReflectionRequest {
        host: String::new(),
        message_request: Some(MessageRequest::ListServices(String::new())),
    };
    let mut responses = client
        .server_reflection_info(tokio_stream::once(request))
        .await
        .unwrap()
        .into_inner();
    let response = responses.message().await.unwrap().unwrap();

    let services: Vec<String> = match response.message_response {
        Some(MessageResponse::ListServicesResponse(list)) => {
            list.service.into_iter().map(|service| service.name).collect()
        }
        other => panic!("expected a service list, got {other:?}"),
    };
    assert!(services.iter().any(|name| name == DISCOUNT_SERVICE_NAME), "{services:?}");
    assert!(services.iter().any(|name| name == "grpc.health.v1.Health"), "{services:?}");

    drop(responses);
    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn health_check_over_tcp() {
    let server = TestServer::start(StaticCatalog::builtin()).await;
    let mut client = HealthClient::connect(server.url()).await.unwrap();

    for service in ["", DISCOUNT_SERVICE_NAME] {
        let response = client
            .check(HealthCheckRequest {
                service: service.to_string(),
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status(), ServingStatus::Serving);
    }

    let unknown = client
        .check(HealthCheckRequest {
            service: "does.not.Exist".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(unknown.code(), Code::NotFound);

    drop(client);
    let state = server.stop().await;
    assert_eq!(state.health.current(), ServingStatus::NotServing);
}
