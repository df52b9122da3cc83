// file: src/index/client.rs
// description: read-only index client: open, search, document mapping
// reference: https://docs.rs/tantivy

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::schema::PostFields;
use crate::models::{IndexStats, SearchHit, SearchResponse};
use crate::query::{QueryBuilder, StructuredQuery};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tantivy::collector::{Count, TopDocs};
use tantivy::query::Query;
use tantivy::schema::{Field, Value};
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument};
use tracing::{debug, info};

pub struct IndexClient {
    index: Index,
    reader: IndexReader,
    fields: PostFields,
    search_config: SearchConfig,
    index_dir: PathBuf,
}

impl IndexClient {
    pub fn open(index_dir: &Path, search_config: SearchConfig) -> Result<Self> {
        Validator::validate_directory(index_dir)?;
        info!("Opening index at {}", index_dir.display());

        let index = Index::open_in_dir(index_dir)?;
        let fields = PostFields::from_schema(&index.schema())?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            fields,
            search_config,
            index_dir: index_dir.to_path_buf(),
        })
    }

    /// Free-text search against the configured default field.
    pub fn search_text(&self, query: &str, top_k: usize) -> Result<SearchResponse> {
        self.search_structured(&StructuredQuery::Text(query.to_string()), top_k)
    }

    pub fn search_structured(
        &self,
        query: &StructuredQuery,
        top_k: usize,
    ) -> Result<SearchResponse> {
        let builder = QueryBuilder::new(&self.index, &self.search_config)?;
        let query = builder.build(query)?;
        self.search(query.as_ref(), top_k)
    }

    pub fn search(&self, query: &dyn Query, top_k: usize) -> Result<SearchResponse> {
        Validator::validate_top_k(top_k)?;

        let searcher = self.reader.searcher();
        // The collector preallocates for the limit, so never ask for more than the index holds.
        let limit = top_k.min(usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX).max(1));
        let (top_docs, total_hits) = searcher.search(query, &(TopDocs::with_limit(limit), Count))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let document: TantivyDocument = searcher.doc(address)?;
            results.push(self.to_hit(score, &document));
        }

        debug!(
            "Query matched {} documents, returning {}",
            total_hits,
            results.len()
        );

        Ok(SearchResponse {
            total_hits: total_hits as u64,
            results,
        })
    }

    pub fn stats(&self) -> IndexStats {
        let searcher = self.reader.searcher();
        IndexStats {
            num_docs: searcher.num_docs(),
            num_segments: searcher.segment_readers().len(),
            index_dir: self.index_dir.display().to_string(),
        }
    }

    fn to_hit(&self, score: f32, document: &TantivyDocument) -> SearchHit {
        SearchHit {
            score,
            url: stored_text(document, self.fields.url),
            title: stored_text(document, self.fields.title),
            body: stored_text(document, self.fields.body),
            comments: stored_text(document, self.fields.comments),
        }
    }
}

fn stored_text(document: &TantivyDocument, field: Field) -> Option<String> {
    document
        .get_first(field)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}
