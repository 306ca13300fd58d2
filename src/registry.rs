//! In-memory job registry
//!
//! Process-wide state holding one record per analysis job, created at
//! startup and torn down with the process (no durable storage). Locking is
//! two-level: the outer map lock is held only for insert/lookup/remove, and
//! every job record carries its own lock, so status queries and pipeline
//! writes on unrelated jobs never serialize against each other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AnalysisJob, JobStatus, SpeechAnalysis};

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Analysis not found: {0}")]
    NotFound(Uuid),

    /// Analysis start requested for a job not in `uploaded` state
    #[error("Analysis {id} already {status:?}")]
    InvalidTransition { id: Uuid, status: JobStatus },

    /// Deleting a job mid-pipeline would pull the file out from under it
    #[error("Analysis {0} is processing and cannot be deleted until it finishes")]
    DeleteWhileProcessing(Uuid),
}

/// Row returned by history queries
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Total score, present only for completed jobs
    pub score: Option<i32>,
}

type JobMap = HashMap<Uuid, Arc<RwLock<AnalysisJob>>>;

/// Process-wide job registry
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<JobMap>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly uploaded job under a caller-generated id
    pub async fn insert(&self, id: Uuid, filename: String, upload_path: PathBuf) {
        let job = AnalysisJob::new(id, filename, upload_path);
        self.jobs
            .write()
            .await
            .insert(id, Arc::new(RwLock::new(job)));
    }

    async fn entry(&self, id: Uuid) -> Result<Arc<RwLock<AnalysisJob>>, RegistryError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Transition `uploaded → processing`
    ///
    /// The transition happens under the job's write lock before any pipeline
    /// work starts, so a concurrent second start attempt is rejected
    /// deterministically. Returns (filename, upload_path) for the pipeline.
    pub async fn begin_processing(
        &self,
        id: Uuid,
    ) -> Result<(String, PathBuf), RegistryError> {
        let entry = self.entry(id).await?;
        let mut job = entry.write().await;
        job.begin_processing()
            .map_err(|status| RegistryError::InvalidTransition { id, status })?;
        Ok((job.filename.clone(), job.upload_path.clone()))
    }

    /// Attach the result and transition to `completed` atomically
    pub async fn complete(&self, id: Uuid, analysis: SpeechAnalysis) -> Result<(), RegistryError> {
        let entry = self.entry(id).await?;
        entry.write().await.complete(analysis);
        Ok(())
    }

    /// Attach the error message and transition to `failed` atomically
    pub async fn fail(&self, id: Uuid, message: String) -> Result<(), RegistryError> {
        let entry = self.entry(id).await?;
        entry.write().await.fail(message);
        Ok(())
    }

    /// Consistent snapshot of one job record
    pub async fn snapshot(&self, id: Uuid) -> Result<AnalysisJob, RegistryError> {
        let entry = self.entry(id).await?;
        let job = entry.read().await;
        Ok(job.clone())
    }

    /// All jobs as summaries, newest first
    pub async fn list(&self) -> Vec<JobSummary> {
        let entries: Vec<Arc<RwLock<AnalysisJob>>> =
            self.jobs.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(entries.len());
        for entry in entries {
            let job = entry.read().await;
            summaries.push(JobSummary {
                id: job.id,
                filename: job.filename.clone(),
                status: job.status,
                created_at: job.created_at,
                score: job.analysis.as_ref().map(|a| a.score.total_score),
            });
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Remove a job record, returning it so the caller can unlink the file
    ///
    /// Refused while the job is `processing`: the pipeline still holds the
    /// backing file and a terminal transition is pending.
    pub async fn remove(&self, id: Uuid) -> Result<AnalysisJob, RegistryError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get(&id).cloned().ok_or(RegistryError::NotFound(id))?;

        // Holding the map write lock here keeps begin_processing (which needs
        // a map read lock to find the entry) from racing the removal.
        let job = entry.read().await;
        if job.status == JobStatus::Processing {
            return Err(RegistryError::DeleteWhileProcessing(id));
        }
        let job = job.clone();
        jobs.remove(&id);
        Ok(job)
    }
}
