use std::sync::Arc;

use crate::jobs::adapter::map_job_to_queue_prompt;
use crate::jobs::list::fetch_jobs;
use crate::models::{
    Backend, JobStatus, JobSummary, Operation, PendingTask, QueueResponse, RemoveAction,
    RunningTask,
};
use crate::query::HistoryQuery;
use crate::transport::Transport;

const ACTIVE_STATUSES: &[JobStatus] = &[JobStatus::InProgress, JobStatus::Pending];

/// Active jobs split into running and pending tasks.
///
/// The split uses the raw job status: once adapted, in-progress and pending
/// rows share the same status flag and can no longer be told apart.
pub async fn fetch_active_jobs(transport: Arc<dyn Transport>) -> QueueResponse {
    let page = match fetch_jobs(
        transport.as_ref(),
        ACTIVE_STATUSES,
        HistoryQuery::default(),
        Operation::FetchQueue,
    )
    .await
    {
        Ok(page) => page,
        Err(error) => {
            tracing::error!(
                backend = %Backend::JobTable,
                operation = %Operation::FetchQueue,
                kind = ?error.kind,
                message = %error.message,
                "failed to fetch active jobs"
            );
            return QueueResponse::default();
        }
    };

    partition_active_jobs(&transport, &page.jobs)
}

fn partition_active_jobs(transport: &Arc<dyn Transport>, jobs: &[JobSummary]) -> QueueResponse {
    let running = jobs
        .iter()
        .filter(|job| job.status == JobStatus::InProgress)
        .map(|job| RunningTask {
            prompt: map_job_to_queue_prompt(job),
            remove: RemoveAction::interrupt(transport.clone(), job.id.clone()),
        })
        .collect();

    let pending = jobs
        .iter()
        .filter(|job| job.status == JobStatus::Pending)
        .map(|job| PendingTask {
            prompt: map_job_to_queue_prompt(job),
        })
        .collect();

    let mut queue = QueueResponse { running, pending };
    queue.dedup_prompt_ids();
    queue
}
