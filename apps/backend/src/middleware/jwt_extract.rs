//! Bearer token authentication for protected scopes.
//!
//! Verifies `Authorization: Bearer <token>` and stores the resulting
//! `Identity` in request extensions before the handler runs. Every failure
//! (missing header, wrong scheme, bad signature, expiry, garbage) produces the
//! same generic 401; the concrete reason only reaches the logs.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use time::OffsetDateTime;
use tracing::error;

use crate::auth::claims::Identity;
use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!("AppState missing from protected scope");
                let err = AppError::internal(ErrorCode::InternalError, "AppState not configured");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let token = match bearer_token(req.headers().get(header::AUTHORIZATION)) {
                Ok(token) => token,
                Err(reason) => {
                    security::bearer_rejected(reason, req.path());
                    return Ok(req
                        .error_response(AppError::unauthorized())
                        .map_into_right_body());
                }
            };

            let claims = match verify_token(&token, OffsetDateTime::now_utc(), &state.security) {
                Ok(claims) => claims,
                Err(err) => {
                    security::bearer_rejected(err.reason(), req.path());
                    return Ok(req
                        .error_response(AppError::unauthorized())
                        .map_into_right_body());
                }
            };

            req.extensions_mut().insert(Identity::from(claims));

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Pull the token out of an `Authorization` header. The error is the reason
/// label used in security logs.
fn bearer_token(value: Option<&HeaderValue>) -> Result<String, &'static str> {
    let value = value.ok_or("missing_bearer")?;
    let value = value.to_str().map_err(|_| "malformed_bearer")?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.to_string())
        }
        _ => Err("malformed_bearer"),
    }
}
