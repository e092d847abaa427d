use crate::jobs::types::{JobError, JobRecord, JobStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Persistence for report jobs.
///
/// `save` replaces the whole row unconditionally. The driver writes step
/// results through `save_if_active`, so a terminal status written elsewhere
/// while a step is running is never overwritten.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: JobRecord) -> Result<Uuid, JobError>;

    async fn get(&self, id: Uuid) -> Result<JobRecord, JobError>;

    async fn save(&self, job: &JobRecord) -> Result<(), JobError>;

    /// Replace the row unless its stored status is already terminal.
    ///
    /// Returns `false` without writing when the stored row is `Completed` or
    /// `Failed`. Backends should make the check and the write atomic.
    async fn save_if_active(&self, job: &JobRecord) -> Result<bool, JobError> {
        if self.get(job.id).await?.status.is_terminal() {
            return Ok(false);
        }
        self.save(job).await?;
        Ok(true)
    }

    /// Overwrite only the status, e.g. to cancel from outside the driver.
    async fn set_status(&self, id: Uuid, status: JobStatus) -> Result<(), JobError> {
        let mut job = self.get(id).await?;
        job.status = status;
        job.updated_at = Utc::now();
        self.save(&job).await
    }
}

/// Process-local store, used by tests and the CLI.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<Uuid, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: JobRecord) -> Result<Uuid, JobError> {
        let id = job.id;
        let mut jobs = self.jobs.lock().await;
        if jobs.contains_key(&id) {
            return Err(JobError::Store(format!("Job {} already exists", id)));
        }
        jobs.insert(id, job);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<JobRecord, JobError> {
        self.jobs
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(JobError::NotFound(id))
    }

    async fn save(&self, job: &JobRecord) -> Result<(), JobError> {
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(&job.id) {
            Some(row) => {
                *row = job.clone();
                Ok(())
            }
            None => Err(JobError::NotFound(job.id)),
        }
    }

    async fn save_if_active(&self, job: &JobRecord) -> Result<bool, JobError> {
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(&job.id) {
            Some(row) if row.status.is_terminal() => Ok(false),
            Some(row) => {
                *row = job.clone();
                Ok(true)
            }
            None => Err(JobError::NotFound(job.id)),
        }
    }
}
