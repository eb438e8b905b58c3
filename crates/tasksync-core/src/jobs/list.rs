use std::sync::Arc;

use crate::jobs::adapter::map_jobs_to_history;
use serde_json::Value;

use crate::models::{
    Backend, HistoryResponse, JobStatus, JobSummary, JobsListResponse, JobsPage, Operation,
    SyncResult,
};
use crate::query::HistoryQuery;
use crate::transport::Transport;

/// List endpoint path. The status list is comma-joined by hand; the backend
/// does not accept a percent-encoded comma.
pub fn jobs_path(statuses: &[JobStatus], query: HistoryQuery) -> String {
    let status_param = statuses
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "/jobs?status={status_param}&limit={}&offset={}",
        query.max_items, query.offset
    )
}

/// One page of job rows, before any adaptation. Rows that do not parse are
/// skipped with a warning; the rest of the page is kept.
pub async fn fetch_jobs(
    transport: &dyn Transport,
    statuses: &[JobStatus],
    query: HistoryQuery,
    operation: Operation,
) -> SyncResult<JobsListResponse> {
    let path = jobs_path(statuses, query);
    tracing::debug!(backend = %Backend::JobTable, operation = %operation, path = %path, "requesting jobs");

    let response = transport
        .fetch(&path)
        .await
        .map_err(|error| error.attributed(Backend::JobTable, operation))?;
    let page: JobsPage = response
        .success_json()
        .map_err(|error| error.attributed(Backend::JobTable, operation))?;

    Ok(JobsListResponse {
        jobs: parse_job_rows(page.jobs, operation),
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    })
}

fn parse_job_rows(rows: Vec<Value>, operation: Operation) -> Vec<JobSummary> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<JobSummary>(row) {
            Ok(job) => Some(job),
            Err(error) => {
                tracing::warn!(
                    backend = %Backend::JobTable,
                    operation = %operation,
                    row = index,
                    message = %error,
                    "skipping malformed job row"
                );
                None
            }
        })
        .collect()
}

/// Completed jobs as history tasks, newest first. Failures yield an empty history.
pub async fn fetch_completed_jobs(
    transport: Arc<dyn Transport>,
    query: HistoryQuery,
) -> HistoryResponse {
    match fetch_jobs(
        transport.as_ref(),
        &[JobStatus::Completed],
        query,
        Operation::FetchHistory,
    )
    .await
    {
        Ok(page) => HistoryResponse {
            history: map_jobs_to_history(&page.jobs),
        },
        Err(error) => {
            tracing::error!(
                backend = %Backend::JobTable,
                operation = %Operation::FetchHistory,
                kind = ?error.kind,
                message = %error.message,
                "failed to fetch job history"
            );
            HistoryResponse::default()
        }
    }
}
