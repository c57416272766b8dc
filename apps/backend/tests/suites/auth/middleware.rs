// Bearer-token middleware on protected scopes. Every rejection must be the
// same generic 401, whatever the underlying reason.

use actix_web::http::StatusCode;
use actix_web::test;
use backend::state::security_config::SecurityConfig;
use backend_test_support::unique_helpers::unique_email;
use serde_json::Value;

use crate::common::{assert_problem_details, TEST_PASSWORD};
use crate::support::auth::{bearer, mint_expired_token, mint_token, register, token_of};
use crate::support::{create_test_app, TestContext};

const PROFILE: &str = "/api/v1/user/profile";

async fn assert_rejected(ctx: &TestContext, authorization: Option<String>) {
    let app = create_test_app(ctx.state.clone()).await;

    let mut req = test::TestRequest::get().uri(PROFILE);
    if let Some(value) = authorization {
        req = req.insert_header(("Authorization", value));
    }
    let resp = test::call_service(&app, req.to_request()).await;

    assert_problem_details(
        resp,
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
        Some("Authentication required"),
    )
    .await;
}

#[actix_web::test]
async fn test_missing_header_is_rejected() {
    let ctx = TestContext::new().await;
    assert_rejected(&ctx, None).await;
}

#[actix_web::test]
async fn test_non_bearer_scheme_is_rejected() {
    let ctx = TestContext::new().await;
    assert_rejected(&ctx, Some("Basic dXNlcjpwYXNz".to_string())).await;
    assert_rejected(&ctx, Some("Bearer".to_string())).await;
    assert_rejected(&ctx, Some("Bearer a b".to_string())).await;
}

#[actix_web::test]
async fn test_garbage_token_is_rejected() {
    let ctx = TestContext::new().await;
    assert_rejected(&ctx, Some("Bearer not-a-jwt".to_string())).await;
    assert_rejected(&ctx, Some("Bearer aaaa.bbbb.cccc".to_string())).await;
}

#[actix_web::test]
async fn test_wrong_secret_is_rejected() {
    let ctx = TestContext::new().await;
    let foreign = SecurityConfig::new("some-other-secret".as_bytes());
    let token = mint_token(1, "a@x.com", &foreign);
    assert_rejected(&ctx, Some(format!("Bearer {token}"))).await;
}

#[actix_web::test]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new().await;
    let token = mint_expired_token(1, "a@x.com", ctx.security());
    assert_rejected(&ctx, Some(format!("Bearer {token}"))).await;
}

#[actix_web::test]
async fn test_scheme_is_case_insensitive() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;
    let body = register(&app, &unique_email("scheme"), TEST_PASSWORD).await;

    let req = test::TestRequest::get()
        .uri(PROFILE)
        .insert_header(("Authorization", format!("bearer {}", token_of(&body))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_rejections_do_not_reach_public_routes() {
    let ctx = TestContext::new().await;
    let app = create_test_app(ctx.state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/ping")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "pong");
}
