// file: src/index/mod.rs
// description: full-text index operations module exports
// reference: internal module structure

pub mod client;
pub mod schema;
pub mod writer;

pub use client::IndexClient;
pub use schema::{PostFields, SchemaManager};
pub use writer::{DocumentWriter, WriteMode};
