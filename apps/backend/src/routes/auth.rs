use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::users::{self, Registration, Session};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: UserSummary::from(&session.user),
        }
    }
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let session = users::register(
        app_state.users.as_ref(),
        &app_state.security,
        Registration {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session = users::login(
        app_state.users.as_ref(),
        &app_state.security,
        &body.email,
        &body.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)));
}
