use std::fmt;

pub const SYNC_EXCHANGE: &str = "sync_exchange";
pub const SYNC_QUEUE: &str = "sync_queue";
pub const SYNC_ROUTING_KEY: &str = "sync.trigger";

/// Exchange types the gateway knows how to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
    Direct,
    Fanout,
}

impl ExchangeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExchangeKind::Direct => "direct",
            ExchangeKind::Fanout => "fanout",
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange, queue and binding applied once at startup. Redeclaring the same
/// descriptor is a no-op on the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyDescriptor {
    pub exchange_name: String,
    pub exchange_kind: ExchangeKind,
    pub queue_name: String,
    pub routing_key: String,
}

impl TopologyDescriptor {
    /// The fixed sync pipeline topology.
    pub fn sync() -> Self {
        Self {
            exchange_name: SYNC_EXCHANGE.to_string(),
            exchange_kind: ExchangeKind::Direct,
            queue_name: SYNC_QUEUE.to_string(),
            routing_key: SYNC_ROUTING_KEY.to_string(),
        }
    }
}

/// Durability flags for a declared exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeOptions {
    pub durable: bool,
    pub auto_delete: bool,
}

/// Durability flags for a declared queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    pub durable: bool,
    pub exclusive: bool,
    pub auto_delete: bool,
}

/// Durable, not auto-deleted.
pub const DURABLE_EXCHANGE: ExchangeOptions = ExchangeOptions {
    durable: true,
    auto_delete: false,
};

/// Durable, shared, not auto-deleted.
pub const DURABLE_QUEUE: QueueOptions = QueueOptions {
    durable: true,
    exclusive: false,
    auto_delete: false,
};
