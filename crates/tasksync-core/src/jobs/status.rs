use crate::models::{JobStatus, StatusFlag, TaskStatus};

/// Canonical status for a job-table row.
///
/// Jobs that have not finished report `success` so they do not render as
/// errored while still in flight. The summary carries no event log, so
/// `messages` is always empty.
pub fn map_job_status(status: JobStatus) -> TaskStatus {
    let status_str = match status {
        JobStatus::Completed => StatusFlag::Success,
        JobStatus::Failed => StatusFlag::Error,
        JobStatus::Cancelled => StatusFlag::Error,
        JobStatus::InProgress => StatusFlag::Success,
        JobStatus::Pending => StatusFlag::Success,
    };

    TaskStatus {
        status_str,
        completed: status == JobStatus::Completed,
        messages: Vec::new(),
    }
}
