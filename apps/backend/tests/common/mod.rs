#![allow(dead_code)]

// tests/common/mod.rs
pub use backend_test_support::problem_details::assert_problem_details;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const TEST_PASSWORD: &str = "secret1";
