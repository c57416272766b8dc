//! Process-wide egress path to the message broker.
//!
//! The gateway owns exactly one transport (one connection, one channel) for
//! the lifetime of the process. Every call takes the same async mutex, so
//! concurrent publishes from in-flight requests reach the channel one at a
//! time and their frames never interleave.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::amqp::AmqpTransport;
use super::memory::MemoryTransport;
use super::topology::{TopologyDescriptor, DURABLE_EXCHANGE, DURABLE_QUEUE};
use super::transport::{BrokerTransport, JSON_CONTENT_TYPE};
use super::BrokerError;

pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// URL scheme selecting the in-process broker.
pub const MEMORY_BROKER_URL: &str = "memory://";

pub struct BrokerGateway {
    transport: Mutex<Option<Box<dyn BrokerTransport>>>,
    publish_timeout: Duration,
}

impl BrokerGateway {
    /// Open a connection and a publishing channel to `url`.
    pub async fn connect(url: &str, publish_timeout: Duration) -> Result<Self, BrokerError> {
        if url.starts_with(MEMORY_BROKER_URL) {
            warn!("using in-process broker; published messages are not durable");
            return Ok(Self::with_transport(
                Box::new(MemoryTransport::new()),
                publish_timeout,
            ));
        }

        let transport = AmqpTransport::connect(url).await?;
        Ok(Self::with_transport(Box::new(transport), publish_timeout))
    }

    pub fn with_transport(transport: Box<dyn BrokerTransport>, publish_timeout: Duration) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
            publish_timeout,
        }
    }

    /// A gateway with no transport; every operation but `close` fails.
    pub fn disconnected() -> Self {
        Self {
            transport: Mutex::new(None),
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    /// Declare the exchange (durable), the queue (durable, shared) and the
    /// binding. Safe to repeat with the same descriptor.
    pub async fn declare_topology(&self, topology: &TopologyDescriptor) -> Result<(), BrokerError> {
        let guard = self.transport.lock().await;
        let transport = guard.as_ref().ok_or(BrokerError::Closed)?;

        transport
            .declare_exchange(
                &topology.exchange_name,
                topology.exchange_kind,
                DURABLE_EXCHANGE,
            )
            .await?;
        transport
            .declare_queue(&topology.queue_name, DURABLE_QUEUE)
            .await?;
        transport
            .bind_queue(
                &topology.queue_name,
                &topology.exchange_name,
                &topology.routing_key,
            )
            .await?;

        info!(
            exchange = %topology.exchange_name,
            kind = %topology.exchange_kind,
            queue = %topology.queue_name,
            routing_key = %topology.routing_key,
            "broker topology declared"
        );
        Ok(())
    }

    /// Publish a JSON body. Success means the broker accepted the frame, not
    /// that it was persisted or consumed.
    pub async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
    ) -> Result<(), BrokerError> {
        let guard = self.transport.lock().await;
        let transport = guard.as_ref().ok_or(BrokerError::Closed)?;

        match timeout(
            self.publish_timeout,
            transport.publish(exchange, routing_key, JSON_CONTENT_TYPE, body),
        )
        .await
        {
            Ok(result) => {
                result?;
                debug!(exchange, routing_key, bytes = body.len(), "message published");
                Ok(())
            }
            Err(_) => Err(BrokerError::Timeout(self.publish_timeout)),
        }
    }

    /// Release channel then connection. Idempotent; a no-op when the gateway
    /// never connected.
    pub async fn close(&self) -> Result<(), BrokerError> {
        let transport = self.transport.lock().await.take();
        match transport {
            Some(transport) => {
                transport.close().await?;
                info!("broker gateway closed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_some()
    }
}
