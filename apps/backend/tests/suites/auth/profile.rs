// Integration tests for GET /api/v1/user/profile.

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::unique_helpers::unique_email;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::common::{assert_problem_details, TEST_PASSWORD};
use crate::support::auth::{bearer, mint_token, register, token_of, user_id_of};
use crate::support::{create_test_app, TestContext};

#[actix_web::test]
async fn test_profile_returns_account_without_password() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;
    let email = unique_email("profile");

    let req = test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({
            "email": email,
            "password": TEST_PASSWORD,
            "first_name": "Grace",
            "last_name": "Hopper"
        }))
        .to_request();
    let registered: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/user/profile")
        .insert_header(bearer(&token_of(&registered)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"].as_i64(), Some(user_id_of(&registered)));
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["first_name"], "Grace");
    assert_eq!(body["last_name"], "Hopper");
    assert_eq!(body["role"], "user");

    let object = body.as_object().expect("profile is an object");
    assert!(!object.contains_key("password"));
    assert!(!object.contains_key("password_hash"));

    for field in ["created_at", "updated_at"] {
        let raw = body[field].as_str().expect("timestamp string");
        OffsetDateTime::parse(raw, &Rfc3339).expect("RFC 3339 timestamp");
    }
}

#[actix_web::test]
async fn test_profile_for_deleted_account_is_not_found() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let registered = register(&app, &unique_email("gone"), TEST_PASSWORD).await;
    ctx.users
        .remove(user_id_of(&registered))
        .expect("user was stored");

    let req = test::TestRequest::get()
        .uri("/api/v1/user/profile")
        .insert_header(bearer(&token_of(&registered)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "USER_NOT_FOUND", StatusCode::NOT_FOUND, None).await;
}

#[actix_web::test]
async fn test_profile_uses_token_identity() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let alice = register(&app, &unique_email("alice"), TEST_PASSWORD).await;
    let bob = register(&app, &unique_email("bob"), TEST_PASSWORD).await;

    let token = mint_token(user_id_of(&bob), "irrelevant@example.test", ctx.security());
    let req = test::TestRequest::get()
        .uri("/api/v1/user/profile")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"].as_i64(), Some(user_id_of(&bob)));
    assert_ne!(body["id"].as_i64(), Some(user_id_of(&alice)));
}
