// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod corpus;
pub mod error;
pub mod exporter;
pub mod index;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod utils;

pub use config::{Config, IndexingConfig, SearchConfig};
pub use corpus::{FileScanner, ParsedBatch, ScannedFile};
pub use error::{Result, SearchError};
pub use exporter::{IngestReport, JsonExporter};
pub use index::{DocumentWriter, IndexClient, PostFields, SchemaManager, WriteMode};
pub use models::{Comment, ErrorResponse, IndexStats, RedditPost, SearchHit, SearchResponse};
pub use pipeline::{IngestPipeline, IngestStats, ProgressTracker};
pub use query::{QueryBuilder, StructuredQuery};
pub use utils::{OperationTimer, Validator};
