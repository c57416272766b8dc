pub mod seed;
pub mod sync;
pub mod users;
