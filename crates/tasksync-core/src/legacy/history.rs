use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::legacy::wire::parse_prompt;
use crate::models::{
    Backend, HistoryResponse, HistoryTask, Operation, SyncError, SyncResult, TaskOutput,
    TaskStatus,
};
use crate::query::HistoryQuery;
use crate::transport::Transport;

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    prompt: Value,
    #[serde(default)]
    outputs: TaskOutput,
    #[serde(default)]
    status: Option<TaskStatus>,
}

pub fn history_path(query: HistoryQuery) -> String {
    if query.offset == 0 {
        format!("/history?max_items={}", query.max_items)
    } else {
        format!(
            "/history?max_items={}&offset={}",
            query.max_items, query.offset
        )
    }
}

/// Finished tasks from `/history`, highest priority first. The endpoint
/// already carries full outputs and status, so entries pass through unadapted.
pub async fn fetch_history(transport: Arc<dyn Transport>, query: HistoryQuery) -> HistoryResponse {
    match request_history(transport.as_ref(), query).await {
        Ok(history) => history,
        Err(error) => {
            let error = error.attributed(Backend::Legacy, Operation::FetchHistory);
            tracing::error!(
                backend = %Backend::Legacy,
                operation = %Operation::FetchHistory,
                kind = ?error.kind,
                message = %error.message,
                "failed to fetch history"
            );
            HistoryResponse::default()
        }
    }
}

async fn request_history(
    transport: &dyn Transport,
    query: HistoryQuery,
) -> SyncResult<HistoryResponse> {
    let path = history_path(query);
    tracing::debug!(backend = %Backend::Legacy, path = %path, "requesting history");

    let response = transport.fetch(&path).await?;
    let entries: Map<String, Value> = response.success_json()?;

    let mut history: Vec<HistoryTask> = entries
        .into_iter()
        .filter_map(|(key, entry)| match parse_entry(entry) {
            Ok(task) => Some(task),
            Err(error) => {
                tracing::warn!(
                    backend = %Backend::Legacy,
                    task_id = %key,
                    message = %error.message,
                    "skipping malformed history entry"
                );
                None
            }
        })
        .collect();
    history.sort_by(|a, b| b.prompt.priority.cmp(&a.prompt.priority));

    Ok(HistoryResponse { history })
}

fn parse_entry(entry: Value) -> SyncResult<HistoryTask> {
    let entry: HistoryEntry = serde_json::from_value(entry)
        .map_err(|error| SyncError::parse(format!("invalid history entry: {error}")))?;

    Ok(HistoryTask {
        prompt: parse_prompt(&entry.prompt)?,
        status: entry.status,
        outputs: entry.outputs,
    })
}
