use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use uuid::Uuid;

use crate::conf::Settings;
use crate::prelude::{AppError, Result};

pub const RESULTS_FILE: &str = "ci_scoring_results.csv";
pub const CHART_FILE: &str = "ci_scoring_graph.png";
const FALLBACK_UPLOAD_NAME: &str = "upload.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        JobId(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for JobId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(JobId)
            .map_err(|_| AppError::InvalidJobId(s.to_string()))
    }
}

/// On-disk layout: `<upload_dir>/<job>/` holds the raw upload and the result CSV,
/// `<static_dir>/<job>/` holds the chart.
#[derive(Debug, Clone)]
pub struct Artifacts {
    upload_dir: PathBuf,
    static_dir: PathBuf,
}

impl Artifacts {
    pub fn new(upload_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Artifacts {
            upload_dir: upload_dir.into(),
            static_dir: static_dir.into(),
        }
    }

    pub fn from_settings(s: &Settings) -> Self {
        Self::new(&s.upload_dir, &s.static_dir)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.static_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                tracing::info!("created {}", dir.display());
            }
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.upload_dir.is_dir() && self.static_dir.is_dir()
    }

    pub fn job_dir(&self, job: &JobId) -> PathBuf {
        self.upload_dir.join(job.to_string())
    }

    pub fn results_path(&self, job: &JobId) -> PathBuf {
        self.job_dir(job).join(RESULTS_FILE)
    }

    pub fn chart_path(&self, job: &JobId) -> PathBuf {
        self.static_dir.join(job.to_string()).join(CHART_FILE)
    }

    /// Only the last component of the client-supplied name is used.
    pub fn upload_path(&self, job: &JobId, file_name: &str) -> PathBuf {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_UPLOAD_NAME);
        self.job_dir(job).join(name)
    }

    pub fn save_upload(&self, job: &JobId, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.upload_path(job, file_name);
        std::fs::create_dir_all(self.job_dir(job))?;
        std::fs::write(&path, data)?;
        tracing::debug!("saved {} bytes to {}", data.len(), path.display());
        Ok(path)
    }
}
