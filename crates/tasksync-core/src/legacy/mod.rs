//! Legacy backend: monolithic `/queue` and `/history` endpoints whose
//! records already have the canonical shape.

pub mod history;
pub mod queue;
pub(crate) mod wire;

use std::sync::Arc;

pub use history::{fetch_history, history_path};
pub use queue::{QUEUE_PATH, fetch_queue};

use crate::fetcher::{DetailFetcher, DetailFuture, ListFetcher, ListFuture};
use crate::models::{Backend, HistoryResponse, PromptId, QueueResponse, TaskOutput, Workflow};
use crate::query::HistoryQuery;
use crate::transport::Transport;

pub struct LegacyBackend;

impl ListFetcher for LegacyBackend {
    const BACKEND: Backend = Backend::Legacy;

    fn fetch_history(
        transport: Arc<dyn Transport>,
        query: HistoryQuery,
    ) -> ListFuture<HistoryResponse> {
        Box::pin(fetch_history(transport, query))
    }

    fn fetch_queue(transport: Arc<dyn Transport>) -> ListFuture<QueueResponse> {
        Box::pin(fetch_queue(transport))
    }
}

// History entries already carry workflow and outputs inline; there is nothing to fetch lazily.
impl DetailFetcher for LegacyBackend {
    fn workflow(_transport: Arc<dyn Transport>, _prompt_id: PromptId) -> DetailFuture<Workflow> {
        Box::pin(async { None })
    }

    fn outputs(_transport: Arc<dyn Transport>, _prompt_id: PromptId) -> DetailFuture<TaskOutput> {
        Box::pin(async { None })
    }
}
