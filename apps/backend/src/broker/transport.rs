use async_trait::async_trait;

use super::topology::{ExchangeKind, ExchangeOptions, QueueOptions};
use super::BrokerError;

/// Content type stamped on every published message.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One channel to a broker. Implementations are not required to be safe for
/// interleaved use; `BrokerGateway` serializes every call.
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    async fn declare_exchange(
        &self,
        name: &str,
        kind: ExchangeKind,
        options: ExchangeOptions,
    ) -> Result<(), BrokerError>;

    async fn declare_queue(&self, name: &str, options: QueueOptions) -> Result<(), BrokerError>;

    async fn bind_queue(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), BrokerError>;

    /// Not mandatory, not immediate: an unroutable message is dropped.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<(), BrokerError>;

    /// Release the channel, then the connection.
    async fn close(&self) -> Result<(), BrokerError>;
}
