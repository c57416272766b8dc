use std::sync::Arc;
use std::time::Duration;

use crate::adapters::users_memory::InMemoryUserStore;
use crate::broker::{BrokerGateway, BrokerTransport};
use crate::repos::users::UserStore;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for `AppState`, shared by `main` and the tests. Anything not
/// supplied falls back to an in-memory store and a disconnected broker.
#[derive(Default)]
pub struct StateBuilder {
    security: Option<SecurityConfig>,
    users: Option<Arc<dyn UserStore>>,
    broker: Option<Arc<BrokerGateway>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = Some(security);
        self
    }

    pub fn with_users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_broker(mut self, broker: Arc<BrokerGateway>) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn with_transport(
        self,
        transport: Box<dyn BrokerTransport>,
        publish_timeout: Duration,
    ) -> Self {
        self.with_broker(Arc::new(BrokerGateway::with_transport(transport, publish_timeout)))
    }

    pub fn build(self) -> AppState {
        AppState::new(
            self.users
                .unwrap_or_else(|| Arc::new(InMemoryUserStore::new())),
            self.broker
                .unwrap_or_else(|| Arc::new(BrokerGateway::disconnected())),
            self.security.unwrap_or_else(SecurityConfig::for_tests),
        )
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
