// file: src/models/post.rs
// description: crawled reddit post model as stored one-per-line in the corpus
// reference: internal data structures

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedditPost {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "deserialize_mod_date")]
    pub mod_date: i64,
}

impl RedditPost {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// All comment bodies joined by a single space.
    pub fn joined_comments(&self) -> String {
        self.comments
            .iter()
            .map(|comment| comment.body.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Identity used to drop duplicate posts: the crawler id when present,
    /// otherwise a content hash.
    pub fn dedupe_key(&self) -> String {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Self::compute_hash(self.title(), self.body(), self.url()),
        }
    }

    fn compute_hash(title: &str, body: &str, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update(b"\n");
        hasher.update(body.as_bytes());
        hasher.update(b"\n");
        hasher.update(url.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn deserialize_mod_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<RawDate>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawDate::Int(value)) => Ok(value),
        Some(RawDate::Float(value)) => Ok(value as i64),
        Some(RawDate::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid mod_date: {}", text))),
    }
}
