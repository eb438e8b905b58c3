use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{SyncResult, TaskOutput};
use crate::transport::Transport;

pub type NodeId = String;

/// Node id to input payload. Empty when the backend did not send inputs.
pub type NodeInputs = Map<String, Value>;

/// Auxiliary prompt fields such as `client_id` or `output_count`.
pub type ExtraData = Map<String, Value>;

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(pub String);

impl PromptId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PromptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromptId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PromptId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Running,
    Pending,
    History,
}

/// The five-element prompt record. On the wire it is a JSON array in field order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PromptTuple", into = "PromptTuple")]
pub struct TaskPrompt {
    /// Descending sort key. Job-table records use the creation timestamp.
    pub priority: i64,
    pub prompt_id: PromptId,
    pub inputs: NodeInputs,
    pub extra_data: ExtraData,
    pub outputs_to_execute: Vec<NodeId>,
}

type PromptTuple = (i64, PromptId, NodeInputs, ExtraData, Vec<NodeId>);

impl From<PromptTuple> for TaskPrompt {
    fn from((priority, prompt_id, inputs, extra_data, outputs_to_execute): PromptTuple) -> Self {
        Self {
            priority,
            prompt_id,
            inputs,
            extra_data,
            outputs_to_execute,
        }
    }
}

impl From<TaskPrompt> for PromptTuple {
    fn from(prompt: TaskPrompt) -> Self {
        (
            prompt.priority,
            prompt.prompt_id,
            prompt.inputs,
            prompt.extra_data,
            prompt.outputs_to_execute,
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFlag {
    Success,
    Error,
}

/// One `(event type, event payload)` pair from an execution log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage(pub String, pub Value);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status_str: StatusFlag,
    pub completed: bool,
    #[serde(default)]
    pub messages: Vec<StatusMessage>,
}

pub type CancelFuture = Pin<Box<dyn Future<Output = SyncResult<()>> + Send>>;

pub type CancelCallback = Arc<dyn Fn() -> CancelFuture + Send + Sync>;

/// Display name plus a zero-argument cancellation callback.
///
/// Invoking the callback issues a single interrupt request. The returned
/// future resolves once that request is answered, not once the task stops;
/// callers re-poll the queue to observe the effect.
#[derive(Clone)]
pub struct RemoveAction {
    pub name: String,
    callback: CancelCallback,
}

impl RemoveAction {
    pub const CANCEL: &'static str = "Cancel";

    pub fn new(name: impl Into<String>, callback: CancelCallback) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }

    /// A `Cancel` action that interrupts `prompt_id` through `transport`.
    pub fn interrupt(transport: Arc<dyn Transport>, prompt_id: PromptId) -> Self {
        Self::new(
            Self::CANCEL,
            Arc::new(move || transport.interrupt(&prompt_id)),
        )
    }

    pub fn invoke(&self) -> CancelFuture {
        (self.callback)()
    }
}

impl Debug for RemoveAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoveAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RunningTask {
    pub prompt: TaskPrompt,
    #[serde(skip)]
    pub remove: RemoveAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingTask {
    pub prompt: TaskPrompt,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryTask {
    pub prompt: TaskPrompt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub outputs: TaskOutput,
}

impl RunningTask {
    pub fn prompt_id(&self) -> &PromptId {
        &self.prompt.prompt_id
    }
}

impl PendingTask {
    pub fn prompt_id(&self) -> &PromptId {
        &self.prompt.prompt_id
    }
}

impl HistoryTask {
    pub fn prompt_id(&self) -> &PromptId {
        &self.prompt.prompt_id
    }
}

/// A canonical task of any kind, tagged with `taskType` when serialized.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "taskType")]
pub enum TaskItem {
    Running(RunningTask),
    Pending(PendingTask),
    History(HistoryTask),
}

impl TaskItem {
    pub fn task_type(&self) -> TaskType {
        match self {
            Self::Running(_) => TaskType::Running,
            Self::Pending(_) => TaskType::Pending,
            Self::History(_) => TaskType::History,
        }
    }

    pub fn prompt(&self) -> &TaskPrompt {
        match self {
            Self::Running(task) => &task.prompt,
            Self::Pending(task) => &task.prompt,
            Self::History(task) => &task.prompt,
        }
    }

    pub fn remove(&self) -> Option<&RemoveAction> {
        match self {
            Self::Running(task) => Some(&task.remove),
            Self::Pending(_) | Self::History(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct QueueResponse {
    #[serde(rename = "Running")]
    pub running: Vec<RunningTask>,
    #[serde(rename = "Pending")]
    pub pending: Vec<PendingTask>,
}

impl QueueResponse {
    pub fn is_empty(&self) -> bool {
        self.running.is_empty() && self.pending.is_empty()
    }

    /// Keeps the first task per prompt id, running entries before pending ones.
    pub fn dedup_prompt_ids(&mut self) {
        let mut seen = HashSet::new();
        self.running.retain(|task| keep_first(&mut seen, task.prompt_id()));
        self.pending.retain(|task| keep_first(&mut seen, task.prompt_id()));
    }

    pub fn find_running(&self, prompt_id: &PromptId) -> Option<&RunningTask> {
        self.running
            .iter()
            .find(|task| task.prompt_id() == prompt_id)
    }

    pub fn into_items(self) -> Vec<TaskItem> {
        self.running
            .into_iter()
            .map(TaskItem::Running)
            .chain(self.pending.into_iter().map(TaskItem::Pending))
            .collect()
    }
}

fn keep_first(seen: &mut HashSet<PromptId>, prompt_id: &PromptId) -> bool {
    let first = seen.insert(prompt_id.clone());
    if !first {
        tracing::debug!(task_id = %prompt_id, "dropping duplicate queue entry");
    }
    first
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(rename = "History")]
    pub history: Vec<HistoryTask>,
}

impl HistoryResponse {
    pub fn into_items(self) -> Vec<TaskItem> {
        self.history.into_iter().map(TaskItem::History).collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use std::sync::Arc;

    use super::{
        CancelFuture, HistoryTask, PendingTask, PromptId, QueueResponse, RemoveAction,
        RunningTask, TaskItem, TaskPrompt, TaskType,
    };

    fn prompt(priority: i64, id: &str) -> TaskPrompt {
        TaskPrompt {
            priority,
            prompt_id: PromptId::from(id),
            inputs: Map::new(),
            extra_data: Map::new(),
            outputs_to_execute: vec!["9".to_string()],
        }
    }

    #[test]
    fn prompt_serializes_as_five_element_array() {
        let value = serde_json::to_value(prompt(7, "abc")).unwrap();
        assert_eq!(value, json!([7, "abc", {}, {}, ["9"]]));
    }

    #[test]
    fn prompt_deserializes_from_array() {
        let parsed: TaskPrompt =
            serde_json::from_value(json!([3, "p-1", {"4": {"class_type": "KSampler"}}, {}, []]))
                .unwrap();
        assert_eq!(parsed.priority, 3);
        assert_eq!(parsed.prompt_id.as_str(), "p-1");
        assert!(parsed.inputs.contains_key("4"));
        assert!(parsed.outputs_to_execute.is_empty());
    }

    #[test]
    fn task_item_serialization_carries_task_type_tag() {
        let pending = TaskItem::Pending(PendingTask {
            prompt: prompt(1, "queued"),
        });
        let value = serde_json::to_value(&pending).unwrap();
        assert_eq!(value["taskType"], "Pending");
        assert_eq!(value["prompt"][1], "queued");
        assert!(pending.remove().is_none());
    }

    #[test]
    fn history_item_reports_history_type() {
        let item = TaskItem::History(HistoryTask {
            prompt: prompt(2, "done"),
            status: None,
            outputs: Default::default(),
        });
        assert_eq!(item.task_type(), TaskType::History);
        assert_eq!(item.prompt().priority, 2);
    }

    fn running(priority: i64, id: &str) -> RunningTask {
        RunningTask {
            prompt: prompt(priority, id),
            remove: RemoveAction::new(
                RemoveAction::CANCEL,
                Arc::new(|| -> CancelFuture { Box::pin(async { Ok(()) }) }),
            ),
        }
    }

    #[test]
    fn dedup_keeps_first_entry_and_prefers_running() {
        let mut queue = QueueResponse {
            running: vec![running(1, "a"), running(2, "b"), running(3, "a")],
            pending: vec![
                PendingTask {
                    prompt: prompt(4, "b"),
                },
                PendingTask {
                    prompt: prompt(5, "c"),
                },
            ],
        };

        queue.dedup_prompt_ids();

        let running: Vec<i64> = queue
            .running
            .iter()
            .map(|task| task.prompt.priority)
            .collect();
        let pending: Vec<&str> = queue
            .pending
            .iter()
            .map(|task| task.prompt_id().as_str())
            .collect();
        assert_eq!(running, vec![1, 2]);
        assert_eq!(pending, vec!["c"]);
    }
}
