// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, SearchError};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(SearchError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(SearchError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_top_k(top_k: usize) -> Result<()> {
        if top_k == 0 {
            return Err(SearchError::Validation(
                "top_k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Joins command-line words into one query string.
    pub fn normalize_query(words: &[String]) -> Result<String> {
        let query = words.join(" ").trim().to_string();
        if query.is_empty() {
            return Err(SearchError::Validation("Query is empty".to_string()));
        }
        Ok(query)
    }

    pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((cut, _)) => format!("{}...", &text[..cut]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_validate_top_k() {
        assert!(Validator::validate_top_k(1).is_ok());
        assert!(Validator::validate_top_k(0).is_err());
    }

    #[test]
    fn test_normalize_query() {
        let words = vec!["  rust".to_string(), "borrow".to_string(), "checker ".to_string()];
        assert_eq!(Validator::normalize_query(&words).unwrap(), "rust borrow checker");
        assert!(Validator::normalize_query(&["   ".to_string()]).is_err());
        assert!(Validator::normalize_query(&[]).is_err());
    }

    #[test]
    fn test_has_extension() {
        let exts = vec!["txt".to_string(), "json".to_string()];
        assert!(Validator::has_extension(Path::new("reddit_batch_1.txt"), &exts));
        assert!(Validator::has_extension(Path::new("dump.JSON"), &exts));
        assert!(!Validator::has_extension(Path::new("logs.md"), &exts));
        assert!(!Validator::has_extension(Path::new("README"), &exts));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("héllo wörld", 4), "héll...");
    }
}
