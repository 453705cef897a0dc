pub mod config;
pub mod logging;

pub mod error;
pub mod fetch;
pub mod heuristics;
pub mod normalize;
pub mod resolver;
pub mod strategy;

pub use error::ResolveError;
pub use normalize::LinkNormalizer;
pub use resolver::{resolve, LinkResolver, UrlResolver};
pub use strategy::{ProxyStrategy, ResolveOptions};
