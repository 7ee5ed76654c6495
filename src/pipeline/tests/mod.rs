//! Unit and service tests for the deal pipeline.

mod ordering_tests;
