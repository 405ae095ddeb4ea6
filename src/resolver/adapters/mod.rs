//! Resolver port implementations.

mod memory;

pub use memory::{FnHandler, InMemoryGateway, InMemoryHandlerDirectory};
