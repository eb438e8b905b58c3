use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use tasksync_core::ACTIVE_BACKEND;
use tasksync_core::models::{
    HistoryResponse, HistoryTask, QueueResponse, StatusFlag, TaskPrompt, TaskType,
};

pub fn header(title: &str, fetched_at: OffsetDateTime) -> String {
    let fetched_at = fetched_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| fetched_at.unix_timestamp().to_string());
    format!("{title} [{ACTIVE_BACKEND}] fetched {fetched_at}")
}

fn prompt_line(task_type: TaskType, prompt: &TaskPrompt) -> String {
    format!(
        "{:<8} {}  priority={}",
        format!("{task_type:?}"),
        prompt.prompt_id,
        prompt.priority
    )
}

pub fn queue_lines(queue: &QueueResponse) -> Vec<String> {
    if queue.is_empty() {
        return vec!["no tasks".to_string()];
    }

    queue
        .running
        .iter()
        .map(|task| prompt_line(TaskType::Running, &task.prompt))
        .chain(
            queue
                .pending
                .iter()
                .map(|task| prompt_line(TaskType::Pending, &task.prompt)),
        )
        .collect()
}

/// Output count as the listing knows it: the backend's hint when present,
/// otherwise the artifacts actually carried.
fn output_count(task: &HistoryTask) -> u64 {
    task.prompt
        .extra_data
        .get("output_count")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or_else(|| {
            task.outputs
                .values()
                .map(|output| output.images.len() as u64)
                .sum()
        })
}

fn history_line(task: &HistoryTask) -> String {
    let status = match &task.status {
        Some(status) if status.completed => "completed",
        Some(status) if status.status_str == StatusFlag::Error => "error",
        Some(_) => "incomplete",
        None => "unknown",
    };
    format!(
        "{}  status={status}  outputs={}",
        prompt_line(TaskType::History, &task.prompt),
        output_count(task)
    )
}

pub fn history_lines(history: &HistoryResponse) -> Vec<String> {
    if history.history.is_empty() {
        return vec!["no tasks".to_string()];
    }
    history.history.iter().map(history_line).collect()
}
