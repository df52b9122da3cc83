// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for index builds
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub posts_indexed: usize,
    pub lines_skipped: usize,
    pub duplicates_skipped: usize,
    pub total_bytes_processed: u64,
    pub duration_secs: f64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.posts_indexed as f64 / self.duration_secs
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_processed + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.files_processed as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_processed: Arc<AtomicUsize>,
    files_failed: Arc<AtomicUsize>,
    posts_indexed: Arc<AtomicUsize>,
    lines_skipped: Arc<AtomicUsize>,
    duplicates_skipped: Arc<AtomicUsize>,
    bytes_processed: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_files: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_files, colored)
    }

    /// Tracks counters without drawing anything.
    pub fn hidden(total_files: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_files,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_files: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            files_processed: Arc::new(AtomicUsize::new(0)),
            files_failed: Arc::new(AtomicUsize::new(0)),
            posts_indexed: Arc::new(AtomicUsize::new(0)),
            lines_skipped: Arc::new(AtomicUsize::new(0)),
            duplicates_skipped: Arc::new(AtomicUsize::new(0)),
            bytes_processed: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_files_processed(&self) {
        self.files_processed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_files_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_post(&self) {
        self.posts_indexed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_lines_skipped(&self, lines: usize) {
        self.lines_skipped.fetch_add(lines, Ordering::SeqCst);
    }

    pub fn add_bytes_processed(&self, bytes: u64) {
        self.bytes_processed.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Indexing complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> IngestStats {
        IngestStats {
            files_processed: self.files_processed.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            posts_indexed: self.posts_indexed.load(Ordering::SeqCst),
            lines_skipped: self.lines_skipped.load(Ordering::SeqCst),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::SeqCst),
            total_bytes_processed: self.bytes_processed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let posts = self.posts_indexed.load(Ordering::SeqCst);
        let skipped = self.lines_skipped.load(Ordering::SeqCst);
        let duplicates = self.duplicates_skipped.load(Ordering::SeqCst);
        let failed = self.files_failed.load(Ordering::SeqCst);

        let message = format!(
            "Posts: {} | Skipped lines: {} | Duplicates: {} | Failed files: {}",
            posts, skipped, duplicates, failed
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_stats_calculations() {
        let mut stats = IngestStats::new();
        stats.files_processed = 9;
        stats.files_failed = 1;
        stats.posts_indexed = 500;
        stats.duration_secs = 10.0;

        assert_eq!(stats.posts_per_second(), 50.0);
        assert!((stats.success_rate() - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_ingest_stats_zero_duration() {
        let stats = IngestStats::new();
        assert_eq!(stats.posts_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counters() {
        let tracker = ProgressTracker::hidden(3);

        tracker.inc_files_processed();
        tracker.inc_files_failed();
        tracker.add_post();
        tracker.add_post();
        tracker.add_duplicate();
        tracker.add_lines_skipped(4);
        tracker.add_bytes_processed(1024);

        let stats = tracker.get_stats();
        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.posts_indexed, 2);
        assert_eq!(stats.duplicates_skipped, 1);
        assert_eq!(stats.lines_skipped, 4);
        assert_eq!(stats.total_bytes_processed, 1024);
    }
}
