// file: src/index/writer.rs
// description: index creation and document insertion for crawled posts
// reference: https://docs.rs/tantivy

use crate::config::IndexingConfig;
use crate::error::{Result, SearchError};
use crate::index::schema::{PostFields, SchemaManager};
use crate::models::RedditPost;
use std::fs;
use std::path::Path;
use tantivy::{Index, IndexWriter, TantivyDocument, doc};
use tracing::{debug, info, warn};

const INDEX_META_FILE: &str = "meta.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace an existing index, or create one in an empty or missing directory.
    Create,
    /// Add to the index already present in the directory.
    Append,
}

pub struct DocumentWriter {
    writer: IndexWriter,
    fields: PostFields,
}

impl DocumentWriter {
    pub fn open(index_dir: &Path, mode: WriteMode, config: &IndexingConfig) -> Result<Self> {
        let index = match mode {
            WriteMode::Create => Self::create_index(index_dir)?,
            WriteMode::Append => {
                info!("Appending to index at {}", index_dir.display());
                Index::open_in_dir(index_dir)?
            }
        };

        let fields = PostFields::from_schema(&index.schema())?;
        let writer = index.writer_with_num_threads::<TantivyDocument>(
            config.writer_threads,
            config.writer_memory_bytes(),
        )?;

        Ok(Self { writer, fields })
    }

    fn create_index(index_dir: &Path) -> Result<Index> {
        if index_dir.exists() {
            if !Self::is_replaceable(index_dir)? {
                return Err(SearchError::Validation(format!(
                    "{} is not empty and does not hold an index; refusing to replace it",
                    index_dir.display()
                )));
            }

            warn!("Replacing existing index at {}", index_dir.display());
            fs::remove_dir_all(index_dir).map_err(|source| SearchError::FileOperation {
                path: index_dir.to_path_buf(),
                source,
            })?;
        }

        fs::create_dir_all(index_dir).map_err(|source| SearchError::FileOperation {
            path: index_dir.to_path_buf(),
            source,
        })?;

        info!("Creating index at {}", index_dir.display());
        let (schema, _) = SchemaManager::build();
        Ok(Index::create_in_dir(index_dir, schema)?)
    }

    /// A directory may be wiped only when it is empty or already an index.
    fn is_replaceable(index_dir: &Path) -> Result<bool> {
        if !index_dir.is_dir() {
            return Ok(false);
        }
        if index_dir.join(INDEX_META_FILE).is_file() {
            return Ok(true);
        }

        let mut entries = fs::read_dir(index_dir).map_err(|source| SearchError::FileOperation {
            path: index_dir.to_path_buf(),
            source,
        })?;
        Ok(entries.next().is_none())
    }

    pub fn add_post(&self, post: &RedditPost) -> Result<()> {
        let fields = &self.fields;
        let document = doc!(
            fields.id => post.dedupe_key(),
            fields.url => post.url(),
            fields.title => post.title(),
            fields.body => post.body(),
            fields.comments => post.joined_comments(),
            fields.mod_date => post.mod_date,
        );

        let opstamp = self.writer.add_document(document)?;
        debug!("Queued post '{}' (opstamp {})", post.title(), opstamp);
        Ok(())
    }

    /// Commits pending documents and waits for background merges.
    pub fn commit(mut self) -> Result<u64> {
        let opstamp = self.writer.commit()?;
        self.writer.wait_merging_threads()?;
        info!("Index committed (opstamp {})", opstamp);
        Ok(opstamp)
    }
}
