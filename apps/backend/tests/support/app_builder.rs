use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use backend::adapters::users_memory::InMemoryUserStore;
use backend::broker::gateway::DEFAULT_PUBLISH_TIMEOUT;
use backend::broker::{MemoryTransport, TopologyDescriptor};
use backend::infra::state::build_state;
use backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;

/// Application state wired to in-process collaborators, with handles kept
/// so tests can inspect or break them.
pub struct TestContext {
    pub state: AppState,
    pub users: Arc<InMemoryUserStore>,
    pub broker: MemoryTransport,
}

impl TestContext {
    /// In-memory users, an in-memory broker with the sync topology
    /// declared, and the test security config.
    pub async fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let broker = MemoryTransport::new();

        let state = build_state()
            .with_security(SecurityConfig::for_tests())
            .with_users(users.clone())
            .with_transport(Box::new(broker.clone()), DEFAULT_PUBLISH_TIMEOUT)
            .build();

        state
            .broker
            .declare_topology(&TopologyDescriptor::sync())
            .await
            .expect("declare sync topology");

        Self {
            state,
            users,
            broker,
        }
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.state.security
    }
}

/// Build a test service with the production routes and the same request
/// middleware stack `main` installs (CORS aside).
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
