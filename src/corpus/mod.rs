// file: src/corpus/mod.rs
// description: Corpus discovery and parsing module exports
// reference: Internal module structure

pub mod reader;
pub mod scanner;

pub use reader::{ParsedBatch, parse_lines};
pub use scanner::{FileScanner, ScannedFile};
