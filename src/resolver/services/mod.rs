//! Resolver services.

mod context;
mod resolver;

pub use context::CallerContext;
pub use resolver::TieredAccessResolver;
