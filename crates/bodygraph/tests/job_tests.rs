use async_trait::async_trait;
use bodygraph::jobs::{
    InMemoryJobStore, JobConfig, JobDriver, JobError, JobRecord, JobStage, JobStatus, JobStore,
    StepRunner,
};
use serde_json::json;
use std::sync::Arc;

/// Writes a section per agent, then joins them for the synthesis.
struct ConcatRunner;

#[async_trait]
impl StepRunner for ConcatRunner {
    async fn run_step(&self, job: &JobRecord) -> Result<String, JobError> {
        let name = job.input["name"].as_str().unwrap_or("someone");
        match job.cursor.stage {
            JobStage::Agents => Ok(format!(
                "Section {} for {}: {}",
                job.cursor.step_index,
                name,
                "detail ".repeat(8)
            )),
            JobStage::Synthesis => {
                let agents = job.progress["agents"]
                    .as_object()
                    .ok_or_else(|| JobError::Store("missing agents".into()))?;
                let mut keys: Vec<usize> = agents.keys().filter_map(|k| k.parse().ok()).collect();
                keys.sort_unstable();
                Ok(keys
                    .iter()
                    .filter_map(|k| job.agent_section(*k))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            JobStage::Done => Ok(String::new()),
        }
    }
}

#[tokio::test]
async fn test_report_job_end_to_end() {
    let store = Arc::new(InMemoryJobStore::new());
    let id = store
        .create(JobRecord::new("user-42", json!({"name": "Ada"})))
        .await
        .unwrap();
    let driver = JobDriver::new(
        store.clone(),
        Arc::new(ConcatRunner),
        JobConfig {
            agent_count: 4,
            min_content_length: 30,
        },
    );

    let job = driver.run(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    let synthesis = job.synthesis().unwrap();
    assert!(synthesis.starts_with("Section 0 for Ada"));
    assert_eq!(synthesis.lines().count(), 4);

    // Completed jobs are not re-run.
    let again = driver.run(id).await.unwrap();
    assert_eq!(again.updated_at, job.updated_at);
}
