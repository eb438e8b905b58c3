//! Job-table backend: paginated `/jobs` listing plus per-job detail lookups.

pub mod adapter;
pub mod detail;
pub mod list;
pub mod queue;
pub mod status;

use std::sync::Arc;

pub use adapter::{
    PREVIEW_NODE, map_job_to_history_task, map_job_to_queue_prompt, map_jobs_to_history,
};
pub use detail::{get_job_detail, get_outputs_from_job, get_workflow_from_job};
pub use list::{fetch_completed_jobs, fetch_jobs, jobs_path};
pub use queue::fetch_active_jobs;
pub use status::map_job_status;

use crate::fetcher::{DetailFetcher, DetailFuture, ListFetcher, ListFuture};
use crate::models::{Backend, HistoryResponse, PromptId, QueueResponse, TaskOutput, Workflow};
use crate::query::HistoryQuery;
use crate::transport::Transport;

pub struct JobTableBackend;

impl ListFetcher for JobTableBackend {
    const BACKEND: Backend = Backend::JobTable;

    fn fetch_history(
        transport: Arc<dyn Transport>,
        query: HistoryQuery,
    ) -> ListFuture<HistoryResponse> {
        Box::pin(fetch_completed_jobs(transport, query))
    }

    fn fetch_queue(transport: Arc<dyn Transport>) -> ListFuture<QueueResponse> {
        Box::pin(fetch_active_jobs(transport))
    }
}

impl DetailFetcher for JobTableBackend {
    fn workflow(transport: Arc<dyn Transport>, prompt_id: PromptId) -> DetailFuture<Workflow> {
        Box::pin(async move { get_workflow_from_job(transport.as_ref(), &prompt_id).await })
    }

    fn outputs(transport: Arc<dyn Transport>, prompt_id: PromptId) -> DetailFuture<TaskOutput> {
        Box::pin(async move { get_outputs_from_job(transport.as_ref(), &prompt_id).await })
    }
}
