// Broker-side failures surface as 500 PUBLISH_FAILED with a generic detail.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::broker::topology::{ExchangeKind, DURABLE_EXCHANGE, SYNC_EXCHANGE, SYNC_QUEUE};
use backend::broker::{BrokerGateway, BrokerTransport, MemoryTransport, TopologyDescriptor};
use backend::infra::state::build_state;
use backend::state::security_config::SecurityConfig;
use serde_json::json;

use crate::common::assert_problem_details;
use crate::support::auth::{bearer, mint_token};
use crate::support::{create_test_app, TestContext};

const TRIGGER: &str = "/api/v1/sync/trigger";

#[actix_web::test]
async fn test_rejected_publish_is_internal_error() {
    let ctx = TestContext::new().await;
    ctx.broker.fail_publishes(true);
    let app = create_test_app(ctx.state.clone()).await;

    let token = mint_token(1, "f@example.test", ctx.security());
    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token))
        .set_json(json!({ "data_type": "note", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem =
        assert_problem_details(resp, "PUBLISH_FAILED", StatusCode::INTERNAL_SERVER_ERROR, None)
            .await;
    assert!(!problem.detail.contains("memory"));

    assert!(ctx.broker.queue_messages(SYNC_QUEUE).is_empty());
}

#[actix_web::test]
async fn test_slow_broker_times_out() {
    let broker = MemoryTransport::new();
    let state = build_state()
        .with_security(SecurityConfig::for_tests())
        .with_transport(Box::new(broker.clone()), Duration::from_millis(50))
        .build();
    state
        .broker
        .declare_topology(&TopologyDescriptor::sync())
        .await
        .unwrap();
    broker.set_publish_delay(Some(Duration::from_secs(2)));

    let token = mint_token(1, "slow@example.test", &state.security);
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token))
        .set_json(json!({ "data_type": "note", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "PUBLISH_FAILED", StatusCode::INTERNAL_SERVER_ERROR, None).await;
}

#[actix_web::test]
async fn test_closed_broker_is_internal_error() {
    let state = build_state()
        .with_security(SecurityConfig::for_tests())
        .with_broker(std::sync::Arc::new(BrokerGateway::disconnected()))
        .build();
    let token = mint_token(1, "closed@example.test", &state.security);
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token))
        .set_json(json!({ "data_type": "note", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "PUBLISH_FAILED", StatusCode::INTERNAL_SERVER_ERROR, None).await;
}

#[actix_web::test]
async fn test_unroutable_publish_is_still_accepted() {
    let broker = MemoryTransport::new();
    let state = build_state()
        .with_security(SecurityConfig::for_tests())
        .with_transport(Box::new(broker.clone()), Duration::from_secs(5))
        .build();
    broker
        .declare_exchange(SYNC_EXCHANGE, ExchangeKind::Direct, DURABLE_EXCHANGE)
        .await
        .unwrap();
    let token = mint_token(1, "drop@example.test", &state.security);
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token))
        .set_json(json!({ "data_type": "note", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(broker.dropped_count(), 1);
}
