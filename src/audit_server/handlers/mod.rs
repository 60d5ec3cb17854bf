//! Audit server HTTP handlers.

mod audit;
mod health;
mod test;

pub use audit::{audit_handler, batch_handler};
pub use health::{health_handler, not_found_handler};
pub use test::test_handler;
