//! Core traits for service resolution.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
