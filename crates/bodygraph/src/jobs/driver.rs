use crate::jobs::store::JobStore;
use crate::jobs::types::{JobConfig, JobCursor, JobError, JobRecord, JobStage, JobStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Executes the external call behind one step.
///
/// `job.cursor` names the step to run; agent steps see every section written
/// so far in `job.progress`.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run_step(&self, job: &JobRecord) -> Result<String, JobError>;
}

/// What a single `JobDriver::step` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step persisted; the cursor now points at the next one.
    Advanced(JobCursor),
    Completed,
    /// The row was not runnable (terminal status set elsewhere).
    Stopped(JobStatus),
}

/// Runs report jobs one persisted step at a time.
pub struct JobDriver<S: JobStore, R: StepRunner> {
    store: Arc<S>,
    runner: Arc<R>,
    config: JobConfig,
}

impl<S: JobStore, R: StepRunner> JobDriver<S, R> {
    pub fn new(store: Arc<S>, runner: Arc<R>, config: JobConfig) -> Self {
        Self {
            store,
            runner,
            config,
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Re-read the job, run exactly one step and persist the result.
    ///
    /// A `Pending` row is saved as `Processing` before the runner is called.
    /// If the row turns terminal while the runner is busy, the step output is
    /// dropped and the external status is kept.
    pub async fn step(&self, id: Uuid) -> Result<StepOutcome, JobError> {
        let mut job = self.store.get(id).await?;
        if job.status.is_terminal() {
            log::debug!("Job {} is {:?}; not stepping", id, job.status);
            return Ok(StepOutcome::Stopped(job.status));
        }

        if job.cursor.stage == JobStage::Agents && job.cursor.step_index >= self.config.agent_count {
            job.cursor = JobCursor {
                stage: JobStage::Synthesis,
                step_index: 0,
            };
        }
        if job.cursor.stage == JobStage::Done {
            job.status = JobStatus::Completed;
            job.updated_at = Utc::now();
            return self.persist(job, StepOutcome::Completed).await;
        }

        if job.status == JobStatus::Pending {
            job.status = JobStatus::Processing;
            job.error = None;
            job.updated_at = Utc::now();
            if !self.store.save_if_active(&job).await? {
                return self.stopped(id).await;
            }
        }

        let cursor = job.cursor;
        let content = match self.runner.run_step(&job).await {
            Ok(content) => content,
            Err(e) => return Err(self.fail(job, e).await),
        };

        let length = content.chars().count();
        if length < self.config.min_content_length {
            let e = JobError::ContentTooShort {
                stage: cursor.stage,
                index: cursor.step_index,
                length,
                min: self.config.min_content_length,
            };
            return Err(self.fail(job, e).await);
        }

        job.record_output(cursor, content);
        job.cursor = cursor.advance(self.config.agent_count);
        let outcome = if job.cursor.stage == JobStage::Done {
            job.status = JobStatus::Completed;
            StepOutcome::Completed
        } else {
            StepOutcome::Advanced(job.cursor)
        };
        job.updated_at = Utc::now();
        let outcome = self.persist(job, outcome).await?;

        if !matches!(outcome, StepOutcome::Stopped(_)) {
            log::info!(
                "Job {}: finished {:?}[{}] ({} chars)",
                id,
                cursor.stage,
                cursor.step_index,
                length
            );
        }
        Ok(outcome)
    }

    /// Step until the job completes, fails or is stopped from outside.
    ///
    /// Returns the final persisted row. A step failure is returned as the
    /// error after the row has been marked `Failed`.
    pub async fn run(&self, id: Uuid) -> Result<JobRecord, JobError> {
        loop {
            match self.step(id).await? {
                StepOutcome::Advanced(_) => continue,
                StepOutcome::Completed => {
                    log::info!("Job {} completed", id);
                    break;
                }
                StepOutcome::Stopped(status) => {
                    log::info!("Job {} stopped with status {:?}", id, status);
                    break;
                }
            }
        }
        self.store.get(id).await
    }

    async fn persist(&self, job: JobRecord, outcome: StepOutcome) -> Result<StepOutcome, JobError> {
        if self.store.save_if_active(&job).await? {
            Ok(outcome)
        } else {
            self.stopped(job.id).await
        }
    }

    async fn stopped(&self, id: Uuid) -> Result<StepOutcome, JobError> {
        let status = self.store.get(id).await?.status;
        log::info!("Job {} became {:?} during the step; output dropped", id, status);
        Ok(StepOutcome::Stopped(status))
    }

    async fn fail(&self, mut job: JobRecord, error: JobError) -> JobError {
        log::warn!("Job {} failed: {}", job.id, error);
        job.status = JobStatus::Failed;
        job.error = Some(error.to_string());
        job.updated_at = Utc::now();
        match self.store.save_if_active(&job).await {
            Ok(true) => {}
            Ok(false) => log::debug!("Job {} already terminal; failure not recorded", job.id),
            Err(save_error) => {
                log::warn!("Could not persist failure for job {}: {}", job.id, save_error)
            }
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::store::InMemoryJobStore;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedRunner {
        calls: AtomicUsize,
        fail_at: Option<usize>,
        short_at: Option<usize>,
    }

    impl ScriptedRunner {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_at: None,
                short_at: None,
            }
        }
    }

    #[async_trait]
    impl StepRunner for ScriptedRunner {
        async fn run_step(&self, job: &JobRecord) -> Result<String, JobError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index = job.cursor.step_index;
            if job.cursor.stage == JobStage::Agents {
                if self.fail_at == Some(index) {
                    return Err(JobError::Step {
                        stage: job.cursor.stage,
                        index,
                        message: "upstream timeout".to_string(),
                    });
                }
                if self.short_at == Some(index) {
                    return Ok("tiny".to_string());
                }
            }
            Ok(format!("{:?} {} ", job.cursor.stage, index).repeat(10))
        }
    }

    fn config() -> JobConfig {
        JobConfig {
            agent_count: 3,
            min_content_length: 20,
        }
    }

    async fn setup(runner: ScriptedRunner) -> (Arc<InMemoryJobStore>, JobDriver<InMemoryJobStore, ScriptedRunner>, Uuid) {
        let store = Arc::new(InMemoryJobStore::new());
        let id = store.create(JobRecord::new("user-1", Value::Null)).await.unwrap();
        let driver = JobDriver::new(store.clone(), Arc::new(runner), config());
        (store, driver, id)
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let (_store, driver, id) = setup(ScriptedRunner::new()).await;
        let job = driver.run(id).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.cursor.stage, JobStage::Done);
        assert!(job.agent_section(2).unwrap().starts_with("Agents 2"));
        assert!(job.synthesis().unwrap().starts_with("Synthesis 0"));
        assert_eq!(driver.runner.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_step_error_marks_failed_and_resumes() {
        let runner = ScriptedRunner {
            fail_at: Some(1),
            ..ScriptedRunner::new()
        };
        let (store, driver, id) = setup(runner).await;

        let err = driver.run(id).await.unwrap_err();
        assert!(matches!(err, JobError::Step { index: 1, .. }));
        let job = store.get(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.cursor, JobCursor { stage: JobStage::Agents, step_index: 1 });
        assert!(job.error.unwrap().contains("upstream timeout"));

        // A fresh driver with a healthy runner picks up at agent 1.
        store.set_status(id, JobStatus::Pending).await.unwrap();
        let healthy = JobDriver::new(store.clone(), Arc::new(ScriptedRunner::new()), config());
        let job = healthy.run(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.error, None);
        assert_eq!(healthy.runner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_short_content_is_fatal() {
        let runner = ScriptedRunner {
            short_at: Some(0),
            ..ScriptedRunner::new()
        };
        let (store, driver, id) = setup(runner).await;

        let err = driver.run(id).await.unwrap_err();
        assert!(matches!(err, JobError::ContentTooShort { length: 4, min: 20, .. }));
        assert_eq!(store.get(id).await.unwrap().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_status_flag_stops_driver() {
        let (store, driver, id) = setup(ScriptedRunner::new()).await;

        assert_eq!(
            driver.step(id).await.unwrap(),
            StepOutcome::Advanced(JobCursor { stage: JobStage::Agents, step_index: 1 })
        );
        store.set_status(id, JobStatus::Failed).await.unwrap();

        let job = driver.run(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.cursor.step_index, 1);
        assert_eq!(driver.runner.calls.load(Ordering::SeqCst), 1);
    }

    /// Cancels the job from inside the first agent step, like a user
    /// hitting "stop" while the external call is in flight.
    struct CancellingRunner {
        store: Arc<InMemoryJobStore>,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<JobStatus>>,
    }

    #[async_trait]
    impl StepRunner for CancellingRunner {
        async fn run_step(&self, job: &JobRecord) -> Result<String, JobError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let stored = self.store.get(job.id).await?;
            self.seen.lock().unwrap().push(stored.status);
            if job.cursor == JobCursor::start() {
                self.store.set_status(job.id, JobStatus::Failed).await?;
            }
            Ok("x".repeat(50))
        }
    }

    #[tokio::test]
    async fn test_cancel_during_step_is_kept() {
        let store = Arc::new(InMemoryJobStore::new());
        let id = store.create(JobRecord::new("user-3", Value::Null)).await.unwrap();
        let runner = Arc::new(CancellingRunner {
            store: store.clone(),
            calls: AtomicUsize::new(0),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let driver = JobDriver::new(store.clone(), runner.clone(), config());

        assert_eq!(driver.step(id).await.unwrap(), StepOutcome::Stopped(JobStatus::Failed));

        let job = driver.run(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.cursor, JobCursor::start());
        assert_eq!(job.agent_section(0), None);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_processing_is_saved_before_the_runner_call() {
        let store = Arc::new(InMemoryJobStore::new());
        let id = store.create(JobRecord::new("user-4", Value::Null)).await.unwrap();
        let runner = Arc::new(CancellingRunner {
            store: store.clone(),
            calls: AtomicUsize::new(0),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let driver = JobDriver::new(store.clone(), runner.clone(), config());

        driver.step(id).await.unwrap();
        assert_eq!(runner.seen.lock().unwrap().as_slice(), &[JobStatus::Processing]);
    }

    #[tokio::test]
    async fn test_zero_agents_goes_straight_to_synthesis() {
        let store = Arc::new(InMemoryJobStore::new());
        let id = store.create(JobRecord::new("user-2", Value::Null)).await.unwrap();
        let driver = JobDriver::new(
            store,
            Arc::new(ScriptedRunner::new()),
            JobConfig { agent_count: 0, min_content_length: 1 },
        );
        assert_eq!(driver.step(id).await.unwrap(), StepOutcome::Completed);
        assert_eq!(driver.runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_job() {
        let (_store, driver, _id) = setup(ScriptedRunner::new()).await;
        let other = Uuid::new_v4();
        assert_eq!(driver.run(other).await.unwrap_err(), JobError::NotFound(other));
    }
}
