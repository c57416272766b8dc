use std::sync::Arc;

use tracing::{info, warn};

use super::StartupError;
use crate::adapters::{InMemoryUserStore, SeaUserStore};
use crate::config::AppConfig;
use crate::infra::db::bootstrap_db;
use crate::repos::users::UserStore;
use crate::services::seed::{seed_users, SeedOutcome};

/// `DATABASE_URL` value selecting the in-process user store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Open the credential store (migrating it when it is a database) and seed
/// it when configured to.
pub async fn init_user_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, StartupError> {
    let store: Arc<dyn UserStore> = if config.database_url.starts_with(MEMORY_DATABASE_URL) {
        warn!("using in-memory user store; accounts are lost on restart");
        Arc::new(InMemoryUserStore::new())
    } else {
        let conn = bootstrap_db(&config.database_url).await?;
        Arc::new(SeaUserStore::new(conn))
    };

    if config.seed_database {
        match seed_users(store.as_ref(), config.bcrypt_cost)
            .await
            .map_err(StartupError::Seed)?
        {
            SeedOutcome::AlreadySeeded => {}
            SeedOutcome::Seeded { demo_users } => {
                info!(demo_users, "seeded development accounts")
            }
        }
    }

    Ok(store)
}
