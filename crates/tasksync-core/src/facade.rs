//! The operations callers use without knowing which backend is bound.

use std::sync::Arc;

use crate::distribution::Active;
use crate::fetcher::{DetailFetcher, ListFetcher};
use crate::models::{HistoryResponse, PromptId, QueueResponse, TaskOutput, Workflow};
use crate::query::HistoryQuery;
use crate::transport::Transport;

pub use crate::query::DEFAULT_MAX_ITEMS;

/// Most recent finished tasks, newest first, at most `max_items` of them.
pub async fn fetch_history(transport: &Arc<dyn Transport>, max_items: usize) -> HistoryResponse {
    fetch_history_page(transport, HistoryQuery::new(max_items)).await
}

/// One explicit page of history.
pub async fn fetch_history_page(
    transport: &Arc<dyn Transport>,
    query: HistoryQuery,
) -> HistoryResponse {
    Active::fetch_history(transport.clone(), query).await
}

pub async fn fetch_queue(transport: &Arc<dyn Transport>) -> QueueResponse {
    Active::fetch_queue(transport.clone()).await
}

/// Workflow document for a finished task, when the bound backend loads it lazily.
pub async fn get_workflow_from_history(
    transport: &Arc<dyn Transport>,
    prompt_id: &PromptId,
) -> Option<Workflow> {
    Active::workflow(transport.clone(), prompt_id.clone()).await
}

/// Full outputs for a finished task, when the bound backend loads them lazily.
pub async fn get_outputs_from_history(
    transport: &Arc<dyn Transport>,
    prompt_id: &PromptId,
) -> Option<TaskOutput> {
    Active::outputs(transport.clone(), prompt_id.clone()).await
}
