//! Job types - one crawl-and-index run and its aggregate progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a crawl job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Stable string form, matching the stored column values.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// A persisted record tracking one crawl-and-index run.
///
/// Counters are updated by every task execution; `tasks_completed_count`
/// never exceeds `tasks_count`, and the status flips to `Completed` only
/// once every assigned link has been processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Store-assigned identifier
    pub id: i64,

    /// Owning chatbot
    pub chatbot_id: Uuid,

    /// Owning organization (denormalized for per-task inserts)
    pub organization_id: i64,

    /// Lifecycle status
    pub status: JobStatus,

    /// Total links assigned across all tasks
    pub tasks_count: i64,

    /// Links processed so far, regardless of outcome
    pub tasks_completed_count: i64,

    /// Links that produced a newly indexed document
    pub tasks_succeeded_count: i64,

    /// When the job was created
    pub created_at: DateTime<Utc>,

    /// When the job finished, if it has
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Whether every assigned link has been processed.
    pub fn is_finished(&self) -> bool {
        self.tasks_completed_count >= self.tasks_count
    }
}

/// Fields needed to insert a new job row.
#[derive(Debug, Clone)]
pub struct NewJob {
    /// Owning chatbot
    pub chatbot_id: Uuid,

    /// Owning organization
    pub organization_id: i64,

    /// Total links the job will process
    pub tasks_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<JobStatus>().is_err());
    }
}
