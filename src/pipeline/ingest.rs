// file: src/pipeline/ingest.rs
// description: corpus ingestion: scan, concurrent reads, dedupe, index writes
// reference: pipeline orchestration

use crate::config::IndexingConfig;
use crate::corpus::{FileScanner, ScannedFile, parse_lines};
use crate::error::Result;
use crate::index::{DocumentWriter, WriteMode};
use crate::pipeline::progress::{IngestStats, ProgressTracker};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

pub struct IngestPipeline {
    config: IndexingConfig,
    show_progress: bool,
    colored: bool,
}

impl IngestPipeline {
    pub fn new(config: IndexingConfig) -> Self {
        Self {
            config,
            show_progress: true,
            colored: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    /// Builds (or extends) the index at `index_dir` from every corpus file
    /// under `data_dir`, committing once at the end.
    pub async fn run(
        &self,
        data_dir: &Path,
        index_dir: &Path,
        mode: WriteMode,
    ) -> Result<IngestStats> {
        let files = FileScanner::new(&self.config).scan_directory(data_dir)?;
        let writer = DocumentWriter::open(index_dir, mode, &self.config)?;

        let tracker = if self.show_progress {
            ProgressTracker::with_color(files.len(), self.colored)
        } else {
            ProgressTracker::hidden(files.len())
        };

        self.ingest(files, &writer, &tracker).await?;
        writer.commit()?;
        tracker.finish();

        let stats = tracker.get_stats();
        info!(
            "Indexed {} posts from {} files in {:.2}s ({:.1} posts/s)",
            stats.posts_indexed,
            stats.files_processed,
            stats.duration_secs,
            stats.posts_per_second()
        );
        Ok(stats)
    }

    /// Files are read concurrently but consumed in scan order, so the first
    /// occurrence of a duplicate post is the one kept.
    pub async fn ingest(
        &self,
        files: Vec<ScannedFile>,
        writer: &DocumentWriter,
        tracker: &ProgressTracker,
    ) -> Result<()> {
        let parallel_workers = self.config.parallel_workers.max(1);
        let mut seen = HashSet::new();

        let reads = stream::iter(files.into_iter().map(|file| async move {
            let content = tokio::fs::read_to_string(&file.path).await;
            (file, content)
        }))
        .buffered(parallel_workers);
        let mut reads = std::pin::pin!(reads);

        while let Some((file, content)) = reads.next().await {
            tracker.set_message(file.relative_path.clone());

            let content = match content {
                Ok(content) => content,
                Err(err) => {
                    warn!("Failed to read {}: {}", file.path.display(), err);
                    tracker.inc_files_failed();
                    continue;
                }
            };

            let batch = parse_lines(&file.relative_path, &content);
            if batch.lines_skipped > 0 {
                warn!(
                    "{}: skipped {} malformed lines",
                    file.relative_path, batch.lines_skipped
                );
            }
            tracker.add_lines_skipped(batch.lines_skipped);

            for post in &batch.posts {
                if !seen.insert(post.dedupe_key()) {
                    tracker.add_duplicate();
                    continue;
                }

                writer.add_post(post)?;
                tracker.add_post();
            }

            tracker.add_bytes_processed(content.len() as u64);
            tracker.inc_files_processed();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::index::IndexClient;
    use std::fs;
    use tempfile::TempDir;

    fn write_corpus(dir: &Path) {
        fs::write(
            dir.join("reddit_batch_1.txt"),
            concat!(
                "{\"id\": \"a\", \"title\": \"Dune\", \"url\": \"u/a\", \"body\": \"spice must flow\"}\n",
                "garbage line\n",
                "{\"id\": \"b\", \"title\": \"Arrival\", \"url\": \"u/b\", \"body\": \"heptapod language\"}\n",
            ),
        )
        .unwrap();
        fs::write(
            dir.join("reddit_batch_2.txt"),
            concat!(
                "{\"id\": \"a\", \"title\": \"Dune again\", \"url\": \"u/a2\", \"body\": \"spice\"}\n",
                "{\"title\": \"No id\", \"url\": \"u/c\", \"body\": \"sandworm spice\"}\n",
            ),
        )
        .unwrap();
        fs::write(dir.join("notes.md"), "not a corpus file").unwrap();
    }

    #[test]
    fn test_run_builds_searchable_index() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let index_dir = out.path().join("index");
        write_corpus(data.path());

        let pipeline = IngestPipeline::new(IndexingConfig::default()).with_progress(false, false);
        let stats = tokio_test::block_on(pipeline.run(data.path(), &index_dir, WriteMode::Create))
            .unwrap();

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_failed, 0);
        assert_eq!(stats.posts_indexed, 3);
        assert_eq!(stats.lines_skipped, 1);
        assert_eq!(stats.duplicates_skipped, 1);

        let client = IndexClient::open(&index_dir, SearchConfig::default()).unwrap();
        let response = client.search_text("spice", 10).unwrap();
        assert_eq!(response.total_hits, 2);

        let titles: HashSet<String> = response
            .results
            .iter()
            .filter_map(|hit| hit.title.clone())
            .collect();
        assert!(titles.contains("Dune"));
        assert!(titles.contains("No id"));
        assert!(!titles.contains("Dune again"));
    }

    #[test]
    fn test_run_append_keeps_previous_documents() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let index_dir = out.path().join("index");
        write_corpus(data.path());

        let pipeline = IngestPipeline::new(IndexingConfig::default()).with_progress(false, false);
        tokio_test::block_on(pipeline.run(data.path(), &index_dir, WriteMode::Create)).unwrap();
        tokio_test::block_on(pipeline.run(data.path(), &index_dir, WriteMode::Append)).unwrap();

        let client = IndexClient::open(&index_dir, SearchConfig::default()).unwrap();
        assert_eq!(client.stats().num_docs, 6);
    }

    #[test]
    fn test_run_refuses_to_overwrite_corpus() {
        let data = TempDir::new().unwrap();
        write_corpus(data.path());

        let pipeline = IngestPipeline::new(IndexingConfig::default()).with_progress(false, false);
        let result =
            tokio_test::block_on(pipeline.run(data.path(), data.path(), WriteMode::Create));

        assert!(result.is_err());
        assert!(data.path().join("reddit_batch_1.txt").exists());
        assert!(data.path().join("notes.md").exists());
    }

    #[test]
    fn test_run_missing_data_dir() {
        let out = TempDir::new().unwrap();
        let pipeline = IngestPipeline::new(IndexingConfig::default()).with_progress(false, false);
        let result = tokio_test::block_on(pipeline.run(
            Path::new("/nonexistent/corpus"),
            &out.path().join("index"),
            WriteMode::Create,
        ));
        assert!(result.is_err());
    }
}
