// file: src/query/mod.rs
// description: query construction module exports
// reference: internal module structure

pub mod builder;
pub mod wildcard;

pub use builder::{QueryBuilder, StructuredQuery};
pub use wildcard::wildcard_to_regex;
