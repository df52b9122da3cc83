// file: src/config.rs
// description: layered configuration loading (json file, environment, cli overrides)
// reference: https://docs.rs/config

use crate::error::{Result, SearchError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "utils/config.json";
pub const ENV_PREFIX: &str = "REDDIT_SEARCH";

/// Smallest per-thread heap tantivy accepts for an index writer.
const MIN_WRITER_MEMORY_PER_THREAD_MB: usize = 15;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "indexDir")]
    pub index_dir: PathBuf,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_field: String,
    pub default_limit: usize,
    pub conjunction_by_default: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_field: "Body".to_string(),
            default_limit: 10,
            conjunction_by_default: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexingConfig {
    pub data_dir: Option<PathBuf>,
    pub writer_memory_mb: usize,
    pub writer_threads: usize,
    pub parallel_workers: usize,
    pub extensions: Vec<String>,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            writer_memory_mb: 50,
            writer_threads: 1,
            parallel_workers: 4,
            extensions: vec!["txt".to_string(), "json".to_string()],
        }
    }
}

/// Merged file and environment layers. Environment keys arrive lowercased, so
/// the index directory is read under each spelling and resolved afterwards.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "indexdir")]
    lower_index_dir: Option<PathBuf>,
    #[serde(rename = "index_dir")]
    snake_index_dir: Option<PathBuf>,
    #[serde(rename = "indexDir")]
    camel_index_dir: Option<PathBuf>,
    #[serde(default)]
    search: SearchConfig,
    #[serde(default)]
    indexing: IndexingConfig,
}

impl IndexingConfig {
    pub fn writer_memory_bytes(&self) -> usize {
        self.writer_memory_mb * 1_000_000
    }
}

impl Config {
    /// Loads `path` as JSON, then `REDDIT_SEARCH__*` environment variables,
    /// then the optional index directory override. The file may only be absent
    /// when the override supplies the index directory.
    pub fn load(path: &Path, index_dir_override: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        Self::load_with_env(path, index_dir_override, None)
    }

    /// Same as [`Config::load`], reading environment variables from `env`
    /// instead of the process when given.
    pub fn load_with_env(
        path: &Path,
        index_dir_override: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let file_required = index_dir_override.is_none();
        if file_required && !path.is_file() {
            return Err(SearchError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(file_required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let raw: RawConfig = settings
            .try_deserialize()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        // Environment spellings win over the file's camelCase key.
        let index_dir = index_dir_override
            .map(Path::to_path_buf)
            .or(raw.lower_index_dir)
            .or(raw.snake_index_dir)
            .or(raw.camel_index_dir)
            .ok_or_else(|| SearchError::Config("indexDir is not set".to_string()))?;

        let config = Config {
            index_dir,
            search: raw.search,
            indexing: raw.indexing,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_index_dir(index_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
            search: SearchConfig::default(),
            indexing: IndexingConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_dir.as_os_str().is_empty() {
            return Err(SearchError::Config("indexDir must not be empty".to_string()));
        }

        if self.search.default_field.trim().is_empty() {
            return Err(SearchError::Config(
                "search.default_field must not be empty".to_string(),
            ));
        }

        if self.search.default_limit == 0 {
            return Err(SearchError::Config(
                "search.default_limit must be greater than 0".to_string(),
            ));
        }

        if self.indexing.parallel_workers == 0 {
            return Err(SearchError::Config(
                "indexing.parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.indexing.writer_threads == 0 {
            return Err(SearchError::Config(
                "indexing.writer_threads must be greater than 0".to_string(),
            ));
        }

        if self.indexing.writer_memory_mb / self.indexing.writer_threads
            < MIN_WRITER_MEMORY_PER_THREAD_MB
        {
            return Err(SearchError::Config(format!(
                "indexing.writer_memory_mb must allow at least {} MB per writer thread",
                MIN_WRITER_MEMORY_PER_THREAD_MB
            )));
        }

        if self.indexing.extensions.is_empty() {
            return Err(SearchError::Config(
                "indexing.extensions must list at least one extension".to_string(),
            ));
        }

        Ok(())
    }
}
