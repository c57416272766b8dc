pub mod broker_failures;
pub mod trigger;
