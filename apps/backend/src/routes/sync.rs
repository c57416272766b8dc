use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::auth::claims::Identity;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::sync::{self, SyncTrigger};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct SyncAccepted {
    pub message: &'static str,
    pub id: String,
}

/// 202 once the broker has the message; consumption happens elsewhere.
async fn trigger(
    identity: Identity,
    body: ValidatedJson<SyncTrigger>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = sync::trigger_sync(&app_state.broker, &identity, body.into_inner()).await?;

    Ok(HttpResponse::Accepted().json(SyncAccepted {
        message: "Sync triggered successfully",
        id,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/trigger").route(web::post().to(trigger)));
}
