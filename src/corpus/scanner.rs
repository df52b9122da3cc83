// file: src/corpus/scanner.rs
// description: Directory walking and corpus file discovery with extension filtering
// reference: https://docs.rs/walkdir

use crate::config::IndexingConfig;
use crate::error::Result;
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct FileScanner {
    extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
}

impl FileScanner {
    pub fn new(config: &IndexingConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
        }
    }

    /// Returns matching files ordered by path.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if !Validator::has_extension(path, &self.extensions) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string();

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative_path,
                size,
            });
        }

        let total_bytes: u64 = files.iter().map(|file| file.size).sum();
        info!("Found {} corpus files ({} bytes)", files.len(), total_bytes);
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("reddit_batch_2.txt"), "{}").unwrap();
        fs::write(temp.path().join("reddit_batch_1.txt"), "{}").unwrap();
        fs::write(temp.path().join("processed_ids.json"), "[]").unwrap();
        fs::write(temp.path().join("logs.md"), "log").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/more.txt"), "{}").unwrap();

        let scanner = FileScanner::new(&IndexingConfig::default());
        let files = scanner.scan_directory(temp.path()).unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "nested/more.txt",
                "processed_ids.json",
                "reddit_batch_1.txt",
                "reddit_batch_2.txt"
            ]
        );
        assert_eq!(files[0].size, 2);
    }

    #[test]
    fn test_missing_directory() {
        let scanner = FileScanner::new(&IndexingConfig::default());
        assert!(scanner.scan_directory(Path::new("/nonexistent/data")).is_err());
    }
}
