//! JSON-file-backed job postings store and curriculum loader.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::ingest::curriculum::Curriculum;
use crate::ingest::jobs::{JobPosting, NewJob};
use crate::ingest::IngestError;

/// Job postings persisted as a pretty-printed JSON array.
///
/// A missing or blank file reads as an empty list. Writes are serialised by
/// an internal mutex; the whole file is rewritten on every add.
pub struct JobStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<JobPosting>, IngestError> {
        Ok(read_json_or_default(&self.path).await?.unwrap_or_default())
    }

    /// Validates `new_job`, stamps id and time, appends it and rewrites the file.
    pub async fn add(&self, new_job: NewJob) -> Result<JobPosting, IngestError> {
        let job = new_job.into_posting(Uuid::new_v4().to_string(), Utc::now())?;

        let _guard = self.write_lock.lock().await;
        let mut jobs = self.list().await?;
        jobs.push(job.clone());

        write_json_pretty(&self.path, &jobs).await?;

        info!("Saved job '{}' ({} jobs total)", job.title, jobs.len());
        Ok(job)
    }
}

/// Loads `curriculum.json`; a missing file is an empty curriculum.
pub async fn load_curriculum(path: &Path) -> Result<Curriculum, IngestError> {
    Ok(read_json_or_default(path).await?.unwrap_or_default())
}

/// `Ok(None)` when the file is missing or blank.
pub(crate) async fn read_json_or_default<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, IngestError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(path, source)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| IngestError::Json {
            path: path.display().to_string(),
            source,
        })
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub(crate) async fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), IngestError> {
    let body = serde_json::to_string_pretty(value).map_err(|source| IngestError::Json {
        path: path.display().to_string(),
        source,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| io_error(path, source))?;
    }
    tokio::fs::write(path, body)
        .await
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> IngestError {
    IngestError::Io {
        path: path.display().to_string(),
        source,
    }
}
