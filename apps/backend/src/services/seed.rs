//! Demo accounts for development databases.

use tracing::{info, warn};

use crate::auth::claims::Role;
use crate::auth::password::hash_password;
use crate::errors::domain::DomainError;
use crate::repos::users::{NewUser, UserStore};

pub const ADMIN_EMAIL: &str = "admin@example.com";

struct SeedUser {
    email: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: Role,
}

const ADMIN: SeedUser = SeedUser {
    email: ADMIN_EMAIL,
    password: "admin123",
    first_name: "Admin",
    last_name: "User",
    role: Role::Admin,
};

const DEMO_USERS: [SeedUser; 2] = [
    SeedUser {
        email: "user1@example.com",
        password: "user123",
        first_name: "John",
        last_name: "Doe",
        role: Role::User,
    },
    SeedUser {
        email: "user2@example.com",
        password: "user456",
        first_name: "Jane",
        last_name: "Smith",
        role: Role::User,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded { demo_users: usize },
}

async fn insert(store: &dyn UserStore, seed: &SeedUser, cost: u32) -> Result<(), DomainError> {
    let password_hash = hash_password(seed.password, cost).await?;
    store
        .create(NewUser {
            email: seed.email.to_string(),
            password_hash,
            first_name: seed.first_name.to_string(),
            last_name: seed.last_name.to_string(),
            role: seed.role,
        })
        .await?;
    Ok(())
}

/// Seed the admin and demo users. Skipped entirely once the admin exists.
/// A failing demo user is logged and skipped; a failing admin aborts.
pub async fn seed_users(
    store: &dyn UserStore,
    bcrypt_cost: u32,
) -> Result<SeedOutcome, DomainError> {
    if store.find_by_email(ADMIN_EMAIL).await?.is_some() {
        info!("database already seeded, skipping");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    insert(store, &ADMIN, bcrypt_cost).await?;
    info!(email = ADMIN_EMAIL, "seeded admin user");

    let mut demo_users = 0;
    for seed in &DEMO_USERS {
        match insert(store, seed, bcrypt_cost).await {
            Ok(()) => demo_users += 1,
            Err(e) => warn!(error = %e, "failed to seed demo user"),
        }
    }

    info!(demo_users, "database seeded");
    Ok(SeedOutcome::Seeded { demo_users })
}
