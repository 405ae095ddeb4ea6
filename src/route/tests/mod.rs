//! Unit tests for the route module.

mod domain_tests;
mod service_tests;
