use actix_web::web;

use crate::middleware::jwt_extract::JwtExtract;

pub mod auth;
pub mod health;
pub mod sync;
pub mod user;

pub const API_PREFIX: &str = "/api/v1";

/// Register every API route under `/api/v1`. `/user` and `/sync` sit behind
/// `JwtExtract`; `/ping`, `/register` and `/login` are public.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .configure(health::configure_routes)
            .configure(auth::configure_routes)
            .service(
                web::scope("/user")
                    .wrap(JwtExtract)
                    .configure(user::configure_routes),
            )
            .service(
                web::scope("/sync")
                    .wrap(JwtExtract)
                    .configure(sync::configure_routes),
            ),
    );
}
