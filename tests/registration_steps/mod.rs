//! Step definitions for curator registration scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
