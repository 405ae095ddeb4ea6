//! Step definitions for tiered access scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
