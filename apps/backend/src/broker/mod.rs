//! Message broker egress: topology declaration and JSON publishing.

pub mod amqp;
pub mod gateway;
pub mod memory;
pub mod topology;
pub mod transport;

use std::time::Duration;

use thiserror::Error;

pub use gateway::BrokerGateway;
pub use memory::MemoryTransport;
pub use topology::TopologyDescriptor;
pub use transport::BrokerTransport;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker connection error: {0}")]
    Connection(String),
    #[error("broker topology error: {0}")]
    Topology(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
    #[error("broker channel is closed")]
    Closed,
}
