//! Startup phase. Nothing here serves traffic; every failure is returned so
//! `main` can exit non-zero before the HTTP server binds.

pub mod broker;
pub mod db;

use thiserror::Error;

use crate::broker::BrokerError;
use crate::config::ConfigError;
use crate::errors::domain::DomainError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("seeding failed: {0}")]
    Seed(DomainError),
    #[error("broker unavailable: {0}")]
    Broker(#[from] BrokerError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
