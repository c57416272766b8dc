//! Helpers shared by the backend integration tests: logging bootstrap,
//! unique test data and Problem Details assertions.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
