//! Infrastructure layer: database access, error translation and state assembly.

pub mod db;
pub mod db_errors;
pub mod state;
