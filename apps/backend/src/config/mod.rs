//! Process configuration read from the environment (and an optional
//! `.env` file) at startup.

pub mod app;

pub use app::{load_dotenv, AppConfig, ConfigError, Environment, RetryPolicy};
