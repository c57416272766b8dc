//! In-process broker with AMQP declaration and routing semantics.
//!
//! Used by tests and by `memory://` local runs. Declarations follow the
//! broker's rules: an identical redeclaration is a no-op, a redeclaration with
//! different properties fails with PRECONDITION_FAILED, bindings form a set.
//! Messages that match no binding are dropped. Each queue retains at most
//! `queue_capacity` messages; the oldest is evicted to make room.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::topology::{ExchangeKind, ExchangeOptions, QueueOptions};
use super::transport::BrokerTransport;
use super::BrokerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub exchange: String,
    pub routing_key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredExchange {
    pub kind: ExchangeKind,
    pub options: ExchangeOptions,
}

#[derive(Debug)]
struct DeclaredQueue {
    options: QueueOptions,
    messages: VecDeque<PublishedMessage>,
}

#[derive(Debug, Default)]
struct BrokerState {
    exchanges: HashMap<String, DeclaredExchange>,
    queues: HashMap<String, DeclaredQueue>,
    // (exchange, queue, routing_key)
    bindings: HashSet<(String, String, String)>,
    closed: bool,
    fail_publishes: bool,
    publish_delay: Option<Duration>,
    queue_capacity: usize,
    dropped: usize,
    evicted: usize,
}

#[derive(Debug, Default)]
struct Inflight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

// Decrements on drop, so a publish abandoned by a timeout is not counted.
struct InflightGuard<'a>(&'a Inflight);

impl<'a> InflightGuard<'a> {
    fn enter(inflight: &'a Inflight) -> Self {
        let now = inflight.current.fetch_add(1, Ordering::SeqCst) + 1;
        inflight.peak.fetch_max(now, Ordering::SeqCst);
        Self(inflight)
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cheap to clone; clones share the same broker state so a test can keep a
/// handle for inspection after moving one into a `BrokerGateway`.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    state: Arc<Mutex<BrokerState>>,
    inflight: Arc<Inflight>,
}

/// Messages retained per queue. Nothing consumes from the in-process broker,
/// so a long `memory://` run keeps only the most recent ones.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(BrokerState {
                queue_capacity: capacity,
                ..BrokerState::default()
            })),
            inflight: Arc::new(Inflight::default()),
        }
    }

    /// Make every subsequent publish fail as a broker-side rejection.
    pub fn fail_publishes(&self, fail: bool) {
        self.state.lock().fail_publishes = fail;
    }

    /// Delay every publish, simulating a slow or stalled broker.
    pub fn set_publish_delay(&self, delay: Option<Duration>) {
        self.state.lock().publish_delay = delay;
    }

    pub fn exchange(&self, name: &str) -> Option<DeclaredExchange> {
        self.state.lock().exchanges.get(name).copied()
    }

    pub fn queue_options(&self, name: &str) -> Option<QueueOptions> {
        self.state.lock().queues.get(name).map(|q| q.options)
    }

    pub fn binding_count(&self) -> usize {
        self.state.lock().bindings.len()
    }

    pub fn queue_messages(&self, name: &str) -> Vec<PublishedMessage> {
        self.state
            .lock()
            .queues
            .get(name)
            .map(|q| q.messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn dropped_count(&self) -> usize {
        self.state.lock().dropped
    }

    /// Messages evicted because their queue was at capacity.
    pub fn evicted_count(&self) -> usize {
        self.state.lock().evicted
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Highest number of publishes observed in flight at the same time.
    pub fn peak_concurrent_publishes(&self) -> usize {
        self.inflight.peak.load(Ordering::SeqCst)
    }

    fn ensure_open(state: &BrokerState) -> Result<(), BrokerError> {
        if state.closed {
            Err(BrokerError::Closed)
        } else {
            Ok(())
        }
    }

    fn deliver(state: &mut BrokerState, message: PublishedMessage) -> Result<(), BrokerError> {
        let targets: Vec<String> = if message.exchange.is_empty() {
            // default exchange routes straight to the queue named by the key
            state
                .queues
                .contains_key(&message.routing_key)
                .then(|| message.routing_key.clone())
                .into_iter()
                .collect()
        } else {
            let exchange = state.exchanges.get(&message.exchange).ok_or_else(|| {
                BrokerError::Publish(format!(
                    "NOT_FOUND - no exchange '{}'",
                    message.exchange
                ))
            })?;
            let mut targets: Vec<String> = state
                .bindings
                .iter()
                .filter(|(ex, _, key)| {
                    ex == &message.exchange
                        && routes(exchange.kind, key, &message.routing_key)
                })
                .map(|(_, queue, _)| queue.clone())
                .collect();
            targets.sort();
            targets.dedup();
            targets
        };

        if targets.is_empty() {
            state.dropped += 1;
            return Ok(());
        }

        let capacity = state.queue_capacity;
        let mut evicted = 0;
        for name in targets {
            if let Some(queue) = state.queues.get_mut(&name) {
                if capacity == 0 {
                    evicted += 1;
                    continue;
                }
                while queue.messages.len() >= capacity {
                    queue.messages.pop_front();
                    evicted += 1;
                }
                queue.messages.push_back(message.clone());
            }
        }
        state.evicted += evicted;
        Ok(())
    }
}

fn routes(kind: ExchangeKind, binding_key: &str, routing_key: &str) -> bool {
    match kind {
        ExchangeKind::Direct => binding_key == routing_key,
        ExchangeKind::Fanout => true,
    }
}

#[async_trait]
impl BrokerTransport for MemoryTransport {
    async fn declare_exchange(
        &self,
        name: &str,
        kind: ExchangeKind,
        options: ExchangeOptions,
    ) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        Self::ensure_open(&state)?;

        let requested = DeclaredExchange { kind, options };
        match state.exchanges.get(name) {
            Some(existing) if *existing == requested => Ok(()),
            Some(existing) => Err(BrokerError::Topology(format!(
                "PRECONDITION_FAILED - exchange '{name}': {existing:?} vs {requested:?}"
            ))),
            None => {
                state.exchanges.insert(name.to_string(), requested);
                Ok(())
            }
        }
    }

    async fn declare_queue(&self, name: &str, options: QueueOptions) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        Self::ensure_open(&state)?;

        match state.queues.get(name) {
            Some(existing) if existing.options == options => Ok(()),
            Some(existing) => Err(BrokerError::Topology(format!(
                "PRECONDITION_FAILED - queue '{name}': {:?} vs {options:?}",
                existing.options
            ))),
            None => {
                state.queues.insert(
                    name.to_string(),
                    DeclaredQueue {
                        options,
                        messages: VecDeque::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn bind_queue(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        Self::ensure_open(&state)?;

        if !state.exchanges.contains_key(exchange) {
            return Err(BrokerError::Topology(format!(
                "NOT_FOUND - no exchange '{exchange}'"
            )));
        }
        if !state.queues.contains_key(queue) {
            return Err(BrokerError::Topology(format!("NOT_FOUND - no queue '{queue}'")));
        }

        state.bindings.insert((
            exchange.to_string(),
            queue.to_string(),
            routing_key.to_string(),
        ));
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<(), BrokerError> {
        let _inflight = InflightGuard::enter(&self.inflight);

        let delay = self.state.lock().publish_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if state.closed {
            Err(BrokerError::Closed)
        } else if state.fail_publishes {
            Err(BrokerError::Publish("broker rejected the write".to_string()))
        } else {
            Self::deliver(
                &mut state,
                PublishedMessage {
                    exchange: exchange.to_string(),
                    routing_key: routing_key.to_string(),
                    content_type: content_type.to_string(),
                    body: body.to_vec(),
                },
            )
        }
    }

    async fn close(&self) -> Result<(), BrokerError> {
        self.state.lock().closed = true;
        Ok(())
    }
}
