// Integration tests for POST /api/v1/login.

use actix_web::http::StatusCode;
use actix_web::test;
use backend::auth::{verify_token, Role};
use backend_test_support::unique_helpers::unique_email;
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::common::{assert_problem_details, TEST_PASSWORD};
use crate::support::auth::{register, user_id_of};
use crate::support::{create_test_app, TestContext};

// ============================================================================
// Happy Path Tests
// ============================================================================

#[actix_web::test]
async fn test_login_returns_verifiable_token() {
    let ctx = TestContext::new().await;
    let security = ctx.security().clone();
    let app = create_test_app(ctx.state.clone()).await;

    let email = unique_email("login");
    let registered = register(&app, &email, TEST_PASSWORD).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(user_id_of(&body), user_id_of(&registered));
    assert_eq!(body["user"]["email"], email.as_str());

    let token = body["token"].as_str().expect("token string");
    let claims = verify_token(token, OffsetDateTime::now_utc(), &security).expect("valid token");
    assert_eq!(claims.user_id, user_id_of(&registered));
    assert_eq!(claims.email, email);
    assert_eq!(claims.role, Role::User);
}

#[actix_web::test]
async fn test_login_email_is_case_insensitive() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let email = unique_email("case");
    register(&app, &email, TEST_PASSWORD).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email.to_uppercase(), "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Rejections
// ============================================================================

#[actix_web::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let email = unique_email("enum");
    register(&app, &email, TEST_PASSWORD).await;

    let wrong_password = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": "not-the-password" }))
        .to_request();
    let a = assert_problem_details(
        test::call_service(&app, wrong_password).await,
        "INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    let unknown_email = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": unique_email("ghost"), "password": TEST_PASSWORD }))
        .to_request();
    let b = assert_problem_details(
        test::call_service(&app, unknown_email).await,
        "INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    assert_eq!(a.detail, b.detail);
    assert_eq!(a.title, b.title);
    assert_ne!(a.trace_id, b.trace_id);
}

#[actix_web::test]
async fn test_login_validation_errors() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "nope", "password": TEST_PASSWORD }))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "INVALID_EMAIL",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": unique_email("empty"), "password": "" }))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "INVALID_PASSWORD",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("")
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Request body is empty"),
    )
    .await;
}
