//! Unit tests for the agent module.

mod service_tests;
