use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::jobs::status::map_job_status;
use crate::models::{HistoryTask, JobSummary, NodeOutput, TaskOutput, TaskPrompt};

/// Output node name under which a job's single preview artifact is exposed.
pub const PREVIEW_NODE: &str = "preview_node";

/// Prompt tuple for a history row. `output_count` lets the UI show how many
/// outputs exist before the full set is lazily loaded.
fn history_prompt(job: &JobSummary) -> TaskPrompt {
    let mut extra_data = Map::new();
    if let Some(count) = job.output_count {
        extra_data.insert("output_count".to_string(), Value::from(count));
    }

    let outputs_to_execute = if job.preview_output.is_some() {
        vec![PREVIEW_NODE.to_string()]
    } else {
        Vec::new()
    };

    TaskPrompt {
        priority: job.create_time,
        prompt_id: job.id.clone(),
        inputs: Map::new(),
        extra_data,
        outputs_to_execute,
    }
}

fn preview_outputs(job: &JobSummary) -> TaskOutput {
    let mut outputs = TaskOutput::new();
    if let Some(preview) = &job.preview_output {
        outputs.insert(
            PREVIEW_NODE.to_string(),
            NodeOutput::images(vec![preview.clone()]),
        );
    }
    outputs
}

pub fn map_job_to_history_task(job: &JobSummary) -> HistoryTask {
    HistoryTask {
        prompt: history_prompt(job),
        status: Some(map_job_status(job.status)),
        outputs: preview_outputs(job),
    }
}

/// Prompt tuple for a queue row. Queue rows carry no outputs or status.
pub fn map_job_to_queue_prompt(job: &JobSummary) -> TaskPrompt {
    let mut extra_data = Map::new();
    extra_data.insert("client_id".to_string(), Value::String(String::new()));

    TaskPrompt {
        priority: job.create_time,
        prompt_id: job.id.clone(),
        inputs: Map::new(),
        extra_data,
        outputs_to_execute: Vec::new(),
    }
}

/// Converts job rows into history tasks, newest first.
///
/// The sort is stable, so jobs sharing a creation time keep their input
/// order. A job id seen more than once keeps only its first (newest) row.
pub fn map_jobs_to_history(jobs: &[JobSummary]) -> Vec<HistoryTask> {
    let mut sorted: Vec<&JobSummary> = jobs.iter().collect();
    sorted.sort_by(|a, b| b.create_time.cmp(&a.create_time));

    let mut seen = HashSet::new();
    sorted
        .into_iter()
        .filter(|job| {
            let first = seen.insert(&job.id);
            if !first {
                tracing::debug!(task_id = %job.id, "dropping duplicate job row");
            }
            first
        })
        .map(map_job_to_history_task)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::{
        PREVIEW_NODE, map_job_to_history_task, map_job_to_queue_prompt, map_jobs_to_history,
    };
    use crate::models::{
        JobStatus, JobSummary, JobsListResponse, PromptId, ResultItem, ResultItemType,
        StatusFlag,
    };

    const COMPLETED_FIXTURE: &str = include_str!("../../tests/fixtures/jobs/completed.json");

    fn job(id: &str, status: JobStatus, create_time: i64) -> JobSummary {
        JobSummary {
            id: PromptId::from(id),
            status,
            create_time,
            update_time: create_time + 10,
            last_state_update: None,
            preview_output: None,
            output_count: None,
            error_message: None,
        }
    }

    fn ids(tasks: &[crate::models::HistoryTask]) -> Vec<&str> {
        tasks.iter().map(|task| task.prompt_id().as_str()).collect()
    }

    #[test]
    fn maps_worked_example() {
        let mut input = job("j1", JobStatus::Completed, 1000);
        input.preview_output = Some(ResultItem {
            filename: "a.png".to_string(),
            subfolder: String::new(),
            kind: ResultItemType::Output,
        });
        input.output_count = Some(2);

        let task = map_job_to_history_task(&input);

        assert_eq!(
            serde_json::to_value(&task.prompt).unwrap(),
            json!([1000, "j1", {}, {"output_count": 2}, ["preview_node"]])
        );
        assert_eq!(
            serde_json::to_value(&task.status).unwrap(),
            json!({"status_str": "success", "completed": true, "messages": []})
        );
        assert_eq!(
            serde_json::to_value(&task.outputs).unwrap(),
            json!({"preview_node": {"images": [{"filename": "a.png", "subfolder": "", "type": "output"}]}})
        );
    }

    #[test]
    fn preview_yields_one_output_node_and_one_outputs_entry() {
        let mut input = job("with-preview", JobStatus::Completed, 1);
        input.preview_output = Some(ResultItem {
            filename: "p.png".to_string(),
            subfolder: "sub".to_string(),
            kind: ResultItemType::Temp,
        });

        let task = map_job_to_history_task(&input);
        assert_eq!(task.prompt.outputs_to_execute, vec![PREVIEW_NODE.to_string()]);
        assert_eq!(task.outputs.len(), 1);
        assert_eq!(task.outputs[PREVIEW_NODE].images.len(), 1);
    }

    #[test]
    fn job_without_preview_or_count_still_maps() {
        let task = map_job_to_history_task(&job("bare", JobStatus::Failed, 5));

        assert!(task.prompt.outputs_to_execute.is_empty());
        assert!(task.outputs.is_empty());
        assert!(task.prompt.extra_data.is_empty());
        assert!(task.prompt.inputs.is_empty());
        let status = task.status.unwrap();
        assert_eq!(status.status_str, StatusFlag::Error);
        assert!(!status.completed);
    }

    #[test]
    fn sorts_newest_first_regardless_of_input_order() {
        let response: JobsListResponse = serde_json::from_str(COMPLETED_FIXTURE).unwrap();
        let tasks = map_jobs_to_history(&response.jobs);

        assert_eq!(ids(&tasks), vec!["job-newest", "job-middle", "job-older"]);
        assert!(
            tasks
                .windows(2)
                .all(|pair| pair[0].prompt.priority >= pair[1].prompt.priority)
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let jobs = vec![
            job("a", JobStatus::Completed, 10),
            job("b", JobStatus::Completed, 20),
            job("c", JobStatus::Completed, 10),
            job("d", JobStatus::Completed, 10),
        ];

        let tasks = map_jobs_to_history(&jobs);
        assert_eq!(ids(&tasks), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn sorted_duplicate_free_input_is_a_fixed_point() {
        let jobs = vec![
            job("c", JobStatus::Completed, 30),
            job("b", JobStatus::Cancelled, 20),
            job("a", JobStatus::Completed, 10),
        ];

        let first = map_jobs_to_history(&jobs);
        let second = map_jobs_to_history(&jobs);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["c", "b", "a"]);
    }

    #[test]
    fn duplicate_ids_keep_newest_row() {
        let jobs = vec![
            job("dup", JobStatus::Completed, 10),
            job("dup", JobStatus::Completed, 30),
            job("other", JobStatus::Completed, 20),
        ];

        let tasks = map_jobs_to_history(&jobs);
        assert_eq!(ids(&tasks), vec!["dup", "other"]);
        assert_eq!(tasks[0].prompt.priority, 30);
    }

    #[test]
    fn queue_prompt_carries_empty_client_id_and_no_outputs() {
        let prompt = map_job_to_queue_prompt(&job("q", JobStatus::Pending, 77));

        let mut expected_extra = Map::new();
        expected_extra.insert("client_id".to_string(), Value::String(String::new()));

        assert_eq!(prompt.priority, 77);
        assert_eq!(prompt.prompt_id.as_str(), "q");
        assert_eq!(prompt.extra_data, expected_extra);
        assert!(prompt.outputs_to_execute.is_empty());
    }
}
