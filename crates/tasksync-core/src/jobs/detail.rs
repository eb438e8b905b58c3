use crate::models::{
    Backend, JobDetail, Operation, PromptId, SyncResult, TaskOutput, Workflow,
};
use crate::transport::Transport;

async fn request_job_detail(
    transport: &dyn Transport,
    prompt_id: &PromptId,
) -> SyncResult<Option<JobDetail>> {
    let path = format!("/jobs/{prompt_id}");
    tracing::debug!(backend = %Backend::JobTable, task_id = %prompt_id, path = %path, "requesting job detail");

    let response = transport.fetch(&path).await?;
    if !response.is_success() {
        tracing::warn!(
            backend = %Backend::JobTable,
            task_id = %prompt_id,
            status = response.status,
            "job not found"
        );
        return Ok(None);
    }

    response.json().map(Some)
}

/// Full record for one job, or `None` when it is absent or cannot be fetched.
pub async fn get_job_detail(transport: &dyn Transport, prompt_id: &PromptId) -> Option<JobDetail> {
    match request_job_detail(transport, prompt_id).await {
        Ok(detail) => detail,
        Err(error) => {
            let error = error.attributed(Backend::JobTable, Operation::FetchDetail);
            tracing::error!(
                backend = %Backend::JobTable,
                operation = %Operation::FetchDetail,
                task_id = %prompt_id,
                kind = ?error.kind,
                message = %error.message,
                "failed to fetch job detail"
            );
            None
        }
    }
}

pub async fn get_workflow_from_job(
    transport: &dyn Transport,
    prompt_id: &PromptId,
) -> Option<Workflow> {
    let detail = get_job_detail(transport, prompt_id).await?;
    detail.workflow_document().cloned()
}

pub async fn get_outputs_from_job(
    transport: &dyn Transport,
    prompt_id: &PromptId,
) -> Option<TaskOutput> {
    get_job_detail(transport, prompt_id).await?.outputs
}
