// Integration tests for POST /api/v1/sync/trigger.

use actix_web::http::StatusCode;
use actix_web::test;
use backend::broker::topology::{SYNC_EXCHANGE, SYNC_QUEUE, SYNC_ROUTING_KEY};
use backend::services::sync::SyncEnvelope;
use backend_test_support::unique_helpers::unique_email;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::common::{assert_problem_details, TEST_PASSWORD};
use crate::support::auth::{bearer, mint_token, register, token_of, user_id_of};
use crate::support::{create_test_app, TestContext};

const TRIGGER: &str = "/api/v1/sync/trigger";

#[actix_web::test]
async fn test_trigger_publishes_envelope() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let registered = register(&app, &unique_email("sync"), TEST_PASSWORD).await;
    let user_id = user_id_of(&registered);

    let before = OffsetDateTime::now_utc().unix_timestamp();
    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token_of(&registered)))
        .set_json(json!({ "data_type": "note", "data": { "x": 1, "tags": ["a", "b"] } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Sync triggered successfully");
    let id = body["id"].as_str().expect("id string");
    Uuid::parse_str(id).expect("id is a UUID");

    let messages = ctx.broker.queue_messages(SYNC_QUEUE);
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(message.exchange, SYNC_EXCHANGE);
    assert_eq!(message.routing_key, SYNC_ROUTING_KEY);
    assert_eq!(message.content_type, "application/json");

    let envelope: SyncEnvelope = serde_json::from_slice(&message.body).expect("envelope JSON");
    assert_eq!(envelope.id, id);
    assert_eq!(envelope.user_id, user_id);
    assert_eq!(envelope.data_type, "note");
    assert_eq!(Value::Object(envelope.data), json!({ "x": 1, "tags": ["a", "b"] }));

    let stamped = OffsetDateTime::parse(&envelope.timestamp, &Rfc3339).expect("RFC 3339");
    assert_eq!(stamped.offset(), time::UtcOffset::UTC);
    assert!(stamped.unix_timestamp() >= before);
}

#[actix_web::test]
async fn test_body_user_id_is_ignored() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let token = mint_token(41, "spoof@example.test", ctx.security());
    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token))
        .set_json(json!({ "data_type": "note", "data": {}, "user_id": 9999 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let messages = ctx.broker.queue_messages(SYNC_QUEUE);
    let envelope: SyncEnvelope = serde_json::from_slice(&messages[0].body).unwrap();
    assert_eq!(envelope.user_id, 41);
}

#[actix_web::test]
async fn test_each_trigger_gets_a_distinct_id() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;
    let token = mint_token(7, "ids@example.test", ctx.security());

    let mut ids = Vec::new();
    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri(TRIGGER)
            .insert_header(bearer(&token))
            .set_json(json!({ "data_type": "note", "data": {} }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert_eq!(ctx.broker.queue_messages(SYNC_QUEUE).len(), 5);
}

#[actix_web::test]
async fn test_trigger_requires_bearer_token() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .set_json(json!({ "data_type": "note", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED, None).await;

    assert!(ctx.broker.queue_messages(SYNC_QUEUE).is_empty());
}

#[actix_web::test]
async fn test_trigger_body_validation() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;
    let token = mint_token(3, "v@example.test", ctx.security());

    let cases = [
        (json!({ "data": {} }), "BAD_REQUEST"),
        (json!({ "data_type": "note" }), "BAD_REQUEST"),
        (json!({ "data_type": "note", "data": [1, 2] }), "BAD_REQUEST"),
        (json!({ "data_type": "note", "data": "text" }), "BAD_REQUEST"),
        (json!({ "data_type": 5, "data": {} }), "BAD_REQUEST"),
        (json!({ "data_type": "", "data": {} }), "INVALID_DATA_TYPE"),
    ];

    for (payload, code) in cases {
        let req = test::TestRequest::post()
            .uri(TRIGGER)
            .insert_header(bearer(&token))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, code, StatusCode::BAD_REQUEST, None).await;
    }

    assert!(ctx.broker.queue_messages(SYNC_QUEUE).is_empty());
}

#[actix_web::test]
async fn test_whitespace_data_type_is_published_as_sent() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;
    let token = mint_token(4, "ws@example.test", ctx.security());

    let req = test::TestRequest::post()
        .uri(TRIGGER)
        .insert_header(bearer(&token))
        .set_json(json!({ "data_type": " ", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let messages = ctx.broker.queue_messages(SYNC_QUEUE);
    assert_eq!(messages.len(), 1);
    let envelope: SyncEnvelope = serde_json::from_slice(&messages[0].body).unwrap();
    assert_eq!(envelope.data_type, " ");
}
