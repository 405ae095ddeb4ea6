//! Unit tests for tiered capability access.
