//! Unit and service tests for follow-up management.

mod domain_tests;
mod reconciler_tests;
