//! Long-running report generation, persisted one step at a time.

pub mod driver;
pub mod store;
pub mod types;

pub use driver::{JobDriver, StepOutcome, StepRunner};
pub use store::{InMemoryJobStore, JobStore};
pub use types::{JobConfig, JobCursor, JobError, JobRecord, JobStage, JobStatus};
