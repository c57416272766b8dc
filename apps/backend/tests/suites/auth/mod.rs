pub mod login;
pub mod middleware;
pub mod profile;
