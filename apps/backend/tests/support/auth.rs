use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use backend::auth::{issue_token, Role};
use backend::state::security_config::SecurityConfig;
use serde_json::{json, Value};
use time::OffsetDateTime;

/// Register through the HTTP API and return the response body
/// (`{token, user}`). Panics unless the server answers 201.
pub async fn register<S, B>(app: &S, email: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

/// Token string from a `{token, user}` body.
pub fn token_of(body: &Value) -> String {
    body["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

/// User id from a `{token, user}` body.
pub fn user_id_of(body: &Value) -> i64 {
    body["user"]["id"].as_i64().expect("user.id should be an integer")
}

/// Mint a token directly, bypassing the store.
pub fn mint_token(user_id: i64, email: &str, security: &SecurityConfig) -> String {
    issue_token(user_id, email, Role::User, OffsetDateTime::now_utc(), security)
        .expect("sign test token")
}

/// Mint a token that expired an hour ago.
pub fn mint_expired_token(user_id: i64, email: &str, security: &SecurityConfig) -> String {
    let issued_at = OffsetDateTime::now_utc() - time::Duration::hours(25);
    issue_token(user_id, email, Role::User, issued_at, security).expect("sign test token")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
