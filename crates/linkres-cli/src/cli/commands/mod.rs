//! CLI command handlers.

mod normalize;
mod resolve;

pub use normalize::run_normalize;
pub use resolve::run_resolve;
