//! Wire types shared with the worker services.
//!
//! Jobs are owned by the workers; this coordinator only creates them and
//! reads their status. Timestamps on the wire are unix milliseconds.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// A job as reported by a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
}

/// Response to a successful job creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedJob {
    pub id: String,
    pub status: JobStatus,
}

/// Filters for the job listing endpoint. Serialized as query parameters;
/// `statuses` stays a comma-separated string on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at_from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
}

fn default_limit() -> u32 {
    20
}

fn default_page() -> u32 {
    1
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
            statuses: None,
            q: None,
            created_at_from: None,
            created_at_to: None,
            updated_at_from: None,
            updated_at_to: None,
            has_error: None,
            question_id: None,
        }
    }
}

/// One page of jobs, echoing the requested page/limit and the worker's
/// computed page count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

/// Request shape accepted by the compressor worker: fetch `url`, produce a
/// low/high variant pair, and push it back through the ingest server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressJobRequest {
    pub question_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_terminal_states() {
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn filter_serializes_only_set_fields() {
        let filter = JobFilter {
            statuses: Some("queued,processing".into()),
            question_id: Some("q1".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("\"statuses\":\"queued,processing\""));
        assert!(json.contains("\"questionId\":\"q1\""));
        assert!(!json.contains("hasError"));
    }
}
