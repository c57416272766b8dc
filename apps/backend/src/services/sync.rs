//! Sync trigger: stamp the caller's request into an envelope and hand it to
//! the broker.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::claims::Identity;
use crate::broker::topology::{SYNC_EXCHANGE, SYNC_ROUTING_KEY};
use crate::broker::BrokerGateway;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Body of `POST /api/v1/sync/trigger`. Unknown fields, including any
/// `user_id`, are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncTrigger {
    pub data_type: String,
    pub data: Map<String, Value>,
}

/// The message published to `sync_exchange`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEnvelope {
    pub id: String,
    pub data_type: String,
    pub data: Map<String, Value>,
    pub timestamp: String,
    pub user_id: i64,
}

/// Build the envelope for `trigger`. `user_id` always comes from the
/// authenticated identity; the timestamp is UTC RFC 3339 at whole seconds.
pub fn build_envelope(
    trigger: SyncTrigger,
    identity: &Identity,
    now: OffsetDateTime,
) -> Result<SyncEnvelope, AppError> {
    if trigger.data_type.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidDataType,
            "data_type must be a non-empty string",
        ));
    }

    let timestamp = OffsetDateTime::from_unix_timestamp(now.unix_timestamp())
        .map_err(|e| e.to_string())
        .and_then(|ts| ts.format(&Rfc3339).map_err(|e| e.to_string()))
        .map_err(|e| AppError::internal(ErrorCode::SerializationFailed, e))?;

    Ok(SyncEnvelope {
        id: Uuid::new_v4().to_string(),
        data_type: trigger.data_type,
        data: trigger.data,
        timestamp,
        user_id: identity.user_id,
    })
}

/// Publish a sync request for `identity`. Returns the envelope id once the
/// broker has accepted the frame; delivery to a consumer is not awaited.
pub async fn trigger_sync(
    broker: &BrokerGateway,
    identity: &Identity,
    trigger: SyncTrigger,
) -> Result<String, AppError> {
    let envelope = build_envelope(trigger, identity, OffsetDateTime::now_utc())?;

    let body = serde_json::to_vec(&envelope)
        .map_err(|e| AppError::internal(ErrorCode::SerializationFailed, e.to_string()))?;

    if let Err(e) = broker.publish(SYNC_EXCHANGE, SYNC_ROUTING_KEY, &body).await {
        error!(
            envelope_id = %envelope.id,
            user_id = identity.user_id,
            error = %e,
            "sync publish failed"
        );
        return Err(e.into());
    }

    info!(
        envelope_id = %envelope.id,
        data_type = %envelope.data_type,
        user_id = identity.user_id,
        bytes = body.len(),
        "sync triggered"
    );
    Ok(envelope.id)
}
