use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::legacy::wire::parse_prompt;
use crate::models::{
    Backend, Operation, PendingTask, QueueResponse, RemoveAction, RunningTask, SyncResult,
    TaskPrompt,
};
use crate::transport::Transport;

pub const QUEUE_PATH: &str = "/queue";

#[derive(Debug, Deserialize)]
struct QueuePayload {
    queue_running: Vec<Value>,
    queue_pending: Vec<Value>,
}

/// Running and pending tasks from `/queue`.
///
/// A failed request or an unreadable body yields an empty queue. A single
/// malformed entry is skipped with a warning and the rest are kept.
pub async fn fetch_queue(transport: Arc<dyn Transport>) -> QueueResponse {
    match request_queue(&transport).await {
        Ok(queue) => queue,
        Err(error) => {
            let error = error.attributed(Backend::Legacy, Operation::FetchQueue);
            tracing::error!(
                backend = %Backend::Legacy,
                operation = %Operation::FetchQueue,
                kind = ?error.kind,
                message = %error.message,
                "failed to fetch queue"
            );
            QueueResponse::default()
        }
    }
}

async fn request_queue(transport: &Arc<dyn Transport>) -> SyncResult<QueueResponse> {
    tracing::debug!(backend = %Backend::Legacy, path = QUEUE_PATH, "requesting queue");
    let response = transport.fetch(QUEUE_PATH).await?;
    let payload: QueuePayload = response.success_json()?;

    let running = parse_entries(&payload.queue_running, "queue_running")
        .map(|prompt| {
            // The running entry is interrupted by its own prompt id.
            let remove = RemoveAction::interrupt(transport.clone(), prompt.prompt_id.clone());
            RunningTask { prompt, remove }
        })
        .collect();

    let pending = parse_entries(&payload.queue_pending, "queue_pending")
        .map(|prompt| PendingTask { prompt })
        .collect();

    let mut queue = QueueResponse { running, pending };
    queue.dedup_prompt_ids();
    Ok(queue)
}

fn parse_entries<'a>(
    entries: &'a [Value],
    list: &'static str,
) -> impl Iterator<Item = TaskPrompt> + 'a {
    entries
        .iter()
        .enumerate()
        .filter_map(move |(index, entry)| match parse_prompt(entry) {
            Ok(prompt) => Some(prompt),
            Err(error) => {
                tracing::warn!(
                    backend = %Backend::Legacy,
                    list,
                    entry = index,
                    message = %error.message,
                    "skipping malformed queue entry"
                );
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{QUEUE_PATH, fetch_queue};
    use crate::models::PromptId;
    use crate::transport::fixture::FixtureTransport;

    const QUEUE_FIXTURE: &str = include_str!("../../tests/fixtures/legacy/queue.json");
    const QUEUE_OBJECTS_FIXTURE: &str =
        include_str!("../../tests/fixtures/legacy/queue_objects.json");

    #[tokio::test]
    async fn splits_native_arrays_into_running_and_pending() {
        let transport = Arc::new(FixtureTransport::new().respond(QUEUE_PATH, 200, QUEUE_FIXTURE));

        let queue = fetch_queue(transport.clone()).await;

        assert_eq!(queue.running.len(), 1);
        assert_eq!(queue.pending.len(), 2);
        assert_eq!(queue.running[0].prompt_id().as_str(), "3f1c9a52-running");
        assert_eq!(queue.running[0].prompt.priority, 12);
        assert_eq!(queue.pending[1].prompt.outputs_to_execute, vec!["9", "12"]);
        assert_eq!(transport.requests(), vec![QUEUE_PATH.to_string()]);
    }

    #[tokio::test]
    async fn cancel_interrupts_by_the_task_own_id() {
        let transport = Arc::new(FixtureTransport::new().respond(QUEUE_PATH, 200, QUEUE_FIXTURE));

        let queue = fetch_queue(transport.clone()).await;
        queue.running[0].remove.invoke().await.unwrap();

        assert_eq!(
            transport.interrupts(),
            vec![PromptId::from("3f1c9a52-running")]
        );
    }

    #[tokio::test]
    async fn accepts_object_encoded_entries() {
        let transport =
            Arc::new(FixtureTransport::new().respond(QUEUE_PATH, 200, QUEUE_OBJECTS_FIXTURE));

        let queue = fetch_queue(transport).await;

        assert_eq!(queue.running[0].prompt_id().as_str(), "obj-running");
        assert_eq!(queue.running[0].prompt.priority, 21);
        assert_eq!(queue.pending[0].prompt_id().as_str(), "obj-pending");
        assert_eq!(queue.pending[0].prompt.priority, 22);
    }

    #[tokio::test]
    async fn rejected_transport_yields_empty_queue() {
        let transport = Arc::new(FixtureTransport::new().fail(QUEUE_PATH));

        let queue = fetch_queue(transport).await;
        assert!(queue.running.is_empty());
        assert!(queue.pending.is_empty());
    }

    #[tokio::test]
    async fn malformed_entry_is_skipped() {
        let transport = Arc::new(FixtureTransport::new().respond(
            QUEUE_PATH,
            200,
            r#"{"queue_running": [[1, "ok", {}, {}, []]], "queue_pending": [["no-number"], [3, "waiting", {}, {}, []]]}"#,
        ));

        let queue = fetch_queue(transport).await;

        assert_eq!(queue.running.len(), 1);
        assert_eq!(queue.running[0].prompt_id().as_str(), "ok");
        assert_eq!(queue.pending.len(), 1);
        assert_eq!(queue.pending[0].prompt_id().as_str(), "waiting");
    }

    #[tokio::test]
    async fn entry_listed_twice_appears_once() {
        let transport = Arc::new(FixtureTransport::new().respond(
            QUEUE_PATH,
            200,
            r#"{"queue_running": [[1, "dup", {}, {}, []]], "queue_pending": [[1, "dup", {}, {}, []], [2, "next", {}, {}, []]]}"#,
        ));

        let queue = fetch_queue(transport).await;

        assert_eq!(queue.running.len(), 1);
        let pending: Vec<&str> = queue
            .pending
            .iter()
            .map(|task| task.prompt_id().as_str())
            .collect();
        assert_eq!(pending, vec!["next"]);
    }

    #[tokio::test]
    async fn missing_arrays_yield_empty_queue() {
        let transport = Arc::new(FixtureTransport::new().respond(QUEUE_PATH, 200, "{}"));

        let queue = fetch_queue(transport).await;
        assert!(queue.is_empty());
    }
}
