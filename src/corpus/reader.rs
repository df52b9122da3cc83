// file: src/corpus/reader.rs
// description: json-lines parsing of crawled post batches

use crate::models::RedditPost;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub posts: Vec<RedditPost>,
    pub lines_skipped: usize,
}

/// One post per line. Blank lines are ignored, malformed ones counted.
pub fn parse_lines(source: &str, content: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RedditPost>(line) {
            Ok(post) => batch.posts.push(post),
            Err(err) => {
                debug!("{}:{}: skipping line: {}", source, line_no + 1, err);
                batch.lines_skipped += 1;
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_skips_bad_input() {
        let content = concat!(
            "{\"id\": \"a\", \"title\": \"one\", \"body\": \"first\"}\n",
            "\n",
            "not json at all\n",
            "{\"id\": \"b\", \"title\": \"two\", \"body\": \"second\"}\n",
            "{\"id\": \"c\", \"mod_date\": \"soon\"}\n",
            "   \n",
        );

        let batch = parse_lines("batch.txt", content);
        assert_eq!(batch.posts.len(), 2);
        assert_eq!(batch.lines_skipped, 2);
        assert_eq!(batch.posts[1].title(), "two");
    }

    #[test]
    fn test_parse_empty_file() {
        let batch = parse_lines("empty.txt", "");
        assert!(batch.posts.is_empty());
        assert_eq!(batch.lines_skipped, 0);
    }
}
