// file: src/exporter/json.rs
// description: json export of index build reports

use crate::error::{Result, SearchError};
use crate::pipeline::IngestStats;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub finished_at: String,
    pub data_dir: String,
    pub index_dir: String,
    #[serde(flatten)]
    pub stats: IngestStats,
}

impl IngestReport {
    pub fn new(data_dir: &Path, index_dir: &Path, stats: IngestStats) -> Self {
        Self {
            finished_at: Utc::now().to_rfc3339(),
            data_dir: data_dir.display().to_string(),
            index_dir: index_dir.display().to_string(),
            stats,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Result<Self> {
        let output_path = output_path.into();
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { output_path })
    }

    pub fn export_report(&self, report: &IngestReport, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        fs::write(&self.output_path, json).map_err(|source| SearchError::FileOperation {
            path: self.output_path.clone(),
            source,
        })?;

        info!("Wrote index report to {}", self.output_path.display());
        Ok(())
    }
}
