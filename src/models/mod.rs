// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod post;
pub mod search_result;

pub use post::{Comment, RedditPost};
pub use search_result::{ErrorResponse, IndexStats, SearchHit, SearchResponse};
