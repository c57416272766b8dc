//! AMQP 0-9-1 transport backed by `lapin`: one connection, one channel.

use std::future::Future;

use async_trait::async_trait;
use lapin::options::{
    BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, info, warn};

use super::topology::{ExchangeKind, ExchangeOptions, QueueOptions};
use super::transport::BrokerTransport;
use super::BrokerError;

const REPLY_SUCCESS: u16 = 200;

pub struct AmqpTransport {
    connection: Connection,
    channel: Channel,
}

impl AmqpTransport {
    /// Open a connection and a publishing channel. An unreachable broker or
    /// rejected credentials yield `BrokerError::Connection`.
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| BrokerError::Connection(format!("failed to connect to broker: {e}")))?;

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                let _ = connection.close(REPLY_SUCCESS, "channel open failed").await;
                return Err(BrokerError::Connection(format!("failed to open channel: {e}")));
            }
        };

        info!(channel_id = channel.id(), "broker channel opened");
        Ok(Self {
            connection,
            channel,
        })
    }
}

fn lapin_kind(kind: ExchangeKind) -> lapin::ExchangeKind {
    match kind {
        ExchangeKind::Direct => lapin::ExchangeKind::Direct,
        ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
    }
}

#[async_trait]
impl BrokerTransport for AmqpTransport {
    async fn declare_exchange(
        &self,
        name: &str,
        kind: ExchangeKind,
        options: ExchangeOptions,
    ) -> Result<(), BrokerError> {
        self.channel
            .exchange_declare(
                name,
                lapin_kind(kind),
                ExchangeDeclareOptions {
                    durable: options.durable,
                    auto_delete: options.auto_delete,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| BrokerError::Topology(format!("exchange {name}: {e}")))
    }

    async fn declare_queue(&self, name: &str, options: QueueOptions) -> Result<(), BrokerError> {
        let queue = self
            .channel
            .queue_declare(
                name,
                QueueDeclareOptions {
                    durable: options.durable,
                    exclusive: options.exclusive,
                    auto_delete: options.auto_delete,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| BrokerError::Topology(format!("queue {name}: {e}")))?;

        debug!(
            queue = name,
            messages = queue.message_count(),
            consumers = queue.consumer_count(),
            "queue declared"
        );
        Ok(())
    }

    async fn bind_queue(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), BrokerError> {
        self.channel
            .queue_bind(
                queue,
                exchange,
                routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| BrokerError::Topology(format!("bind {queue} -> {exchange}: {e}")))
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<(), BrokerError> {
        if !self.channel.status().connected() {
            return Err(BrokerError::Closed);
        }

        // The returned confirm is not awaited: publisher confirms are not
        // enabled, so acceptance of the frame is the only guarantee.
        self.channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions {
                    mandatory: false,
                    immediate: false,
                },
                body,
                BasicProperties::default().with_content_type(content_type.into()),
            )
            .await
            .map(|_confirm| ())
            .map_err(|e| BrokerError::Publish(e.to_string()))
    }

    async fn close(&self) -> Result<(), BrokerError> {
        let channel = async {
            if !self.channel.status().connected() {
                return Ok(());
            }
            self.channel
                .close(REPLY_SUCCESS, "bye")
                .await
                .map_err(|e| BrokerError::Connection(format!("channel close: {e}")))
        };
        let connection = async {
            if !self.connection.status().connected() {
                return Ok(());
            }
            self.connection
                .close(REPLY_SUCCESS, "bye")
                .await
                .map_err(|e| BrokerError::Connection(format!("connection close: {e}")))
        };
        close_in_order(channel, connection).await
    }
}

/// Await the channel close, then the connection close. The connection close
/// runs even when the channel close fails; the first error wins.
async fn close_in_order<C, K>(channel: C, connection: K) -> Result<(), BrokerError>
where
    C: Future<Output = Result<(), BrokerError>>,
    K: Future<Output = Result<(), BrokerError>>,
{
    let channel = channel.await;
    if let Err(e) = &channel {
        warn!(error = %e, "channel close failed, closing connection anyway");
    }
    let connection = connection.await;
    channel.and(connection)
}
