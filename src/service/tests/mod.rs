//! Unit tests for the service instance module.

mod service_tests;
