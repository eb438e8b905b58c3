use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::models::{Backend, HistoryResponse, PromptId, QueueResponse, TaskOutput, Workflow};
use crate::query::HistoryQuery;
use crate::transport::Transport;

pub type ListFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub type DetailFuture<T> = Pin<Box<dyn Future<Output = Option<T>> + Send>>;

/// Queue and history listing for one backend.
///
/// Implementations never fail: transport and parse errors are logged and
/// reported as empty collections.
pub trait ListFetcher {
    const BACKEND: Backend;

    fn fetch_history(
        transport: Arc<dyn Transport>,
        query: HistoryQuery,
    ) -> ListFuture<HistoryResponse>;

    fn fetch_queue(transport: Arc<dyn Transport>) -> ListFuture<QueueResponse>;
}

/// Lazy lookup of data the history listing may have left out.
///
/// `None` covers absence, transport failure and malformed payloads alike.
pub trait DetailFetcher {
    fn workflow(transport: Arc<dyn Transport>, prompt_id: PromptId) -> DetailFuture<Workflow>;

    fn outputs(transport: Arc<dyn Transport>, prompt_id: PromptId) -> DetailFuture<TaskOutput>;
}
