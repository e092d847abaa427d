use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    /// One external call per agent, `step_index` = agent number.
    Agents,
    /// Single call combining every agent section.
    Synthesis,
    Done,
}

/// Persisted resume point: the next step to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCursor {
    pub stage: JobStage,
    pub step_index: usize,
}

impl JobCursor {
    pub fn start() -> Self {
        Self {
            stage: JobStage::Agents,
            step_index: 0,
        }
    }

    /// Cursor after the step at `self` has been persisted.
    pub fn advance(self, agent_count: usize) -> Self {
        match self.stage {
            JobStage::Agents if self.step_index + 1 < agent_count => Self {
                stage: JobStage::Agents,
                step_index: self.step_index + 1,
            },
            JobStage::Agents => Self {
                stage: JobStage::Synthesis,
                step_index: 0,
            },
            JobStage::Synthesis | JobStage::Done => Self {
                stage: JobStage::Done,
                step_index: 0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub agent_count: usize,
    /// Generated sections shorter than this (in characters) fail the job
    pub min_content_length: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            agent_count: 30,
            min_content_length: 200,
        }
    }
}

/// A report job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub user_id: String,
    pub status: JobStatus,
    pub cursor: JobCursor,
    /// `{"agents": {"0": "...", ...}, "synthesis": "..."}`
    pub progress: Value,
    /// Input the steps work from (typically a serialized blueprint)
    pub input: Value,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(user_id: impl Into<String>, input: Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            status: JobStatus::Pending,
            cursor: JobCursor::start(),
            progress: json!({ "agents": {} }),
            input,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn agent_section(&self, index: usize) -> Option<&str> {
        self.progress
            .get("agents")
            .and_then(|a| a.get(index.to_string()))
            .and_then(Value::as_str)
    }

    pub fn synthesis(&self) -> Option<&str> {
        self.progress.get("synthesis").and_then(Value::as_str)
    }

    pub(crate) fn record_output(&mut self, cursor: JobCursor, content: String) {
        if !self.progress.is_object() {
            self.progress = json!({ "agents": {} });
        }
        match cursor.stage {
            JobStage::Agents => {
                let agents = &mut self.progress["agents"];
                if !agents.is_object() {
                    *agents = json!({});
                }
                agents[cursor.step_index.to_string()] = Value::String(content);
            }
            JobStage::Synthesis => {
                self.progress["synthesis"] = Value::String(content);
            }
            JobStage::Done => {}
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),
    #[error("Step {stage:?}[{index}] failed: {message}")]
    Step {
        stage: JobStage,
        index: usize,
        message: String,
    },
    #[error("Step {stage:?}[{index}] produced {length} characters, need at least {min}")]
    ContentTooShort {
        stage: JobStage,
        index: usize,
        length: usize,
        min: usize,
    },
    #[error("Job store error: {0}")]
    Store(String),
}
