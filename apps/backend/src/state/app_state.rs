use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::adapters::users_memory::InMemoryUserStore;
use crate::broker::BrokerGateway;
use crate::repos::users::UserStore;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    /// The single broker egress path for the process.
    pub broker: Arc<BrokerGateway>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        broker: Arc<BrokerGateway>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            users,
            broker,
            security,
        }
    }

    /// Empty in-memory store, disconnected broker and test security settings.
    pub fn for_tests() -> Self {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(BrokerGateway::disconnected()),
            SecurityConfig::for_tests(),
        )
    }
}
