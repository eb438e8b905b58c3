use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::models::{PreviewOutput, PromptId, TaskOutput};

/// Opaque workflow document; its schema belongs to the editor, not to this layer.
pub type Workflow = Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Row returned by the list endpoint. The job id doubles as the prompt id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: PromptId,
    pub status: JobStatus,
    #[serde(deserialize_with = "timestamp")]
    pub create_time: i64,
    #[serde(default, deserialize_with = "timestamp")]
    pub update_time: i64,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub last_state_update: Option<i64>,
    #[serde(default)]
    pub preview_output: Option<PreviewOutput>,
    #[serde(default)]
    pub output_count: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Millisecond timestamps arrive as integers or floats; floats are truncated.
fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    number_to_timestamp(&number).ok_or_else(|| D::Error::custom("timestamp out of range"))
}

fn optional_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<Number>::deserialize(deserializer)? {
        Some(number) => number_to_timestamp(&number)
            .map(Some)
            .ok_or_else(|| D::Error::custom("timestamp out of range")),
        None => Ok(None),
    }
}

fn number_to_timestamp(number: &Number) -> Option<i64> {
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|timestamp| timestamp as i64))
}

/// Optional detail sub-record. A malformed one degrades to `None` instead of
/// failing the whole detail.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(record) => Ok(Some(record)),
        Err(error) => {
            tracing::warn!(message = %error, "ignoring malformed job detail field");
            Ok(None)
        }
    }
}

/// Page of job rows as listed by the backend. Rows are kept raw so a single
/// malformed row can be skipped without losing the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobsPage {
    pub jobs: Vec<Value>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobsListResponse {
    pub jobs: Vec<JobSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PngInfo {
    #[serde(default)]
    pub workflow: Option<Workflow>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExtraData {
    #[serde(default)]
    pub extra_pnginfo: Option<PngInfo>,
}

/// Workflow structure as stored by the backend: the editor document sits
/// under `extra_data.extra_pnginfo.workflow`, the executable graph under `prompt`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEnvelope {
    #[serde(default)]
    pub extra_data: Option<WorkflowExtraData>,
    #[serde(default)]
    pub prompt: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub completed: bool,
    #[serde(default)]
    pub messages: Vec<(String, Value)>,
    pub status_str: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionNodeMeta {
    pub node_id: String,
    pub display_node: String,
    #[serde(default)]
    pub parent_node: Option<String>,
    pub real_node_id: String,
}

/// Full record from the per-job detail endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub summary: JobSummary,
    #[serde(default, deserialize_with = "lenient")]
    pub workflow: Option<WorkflowEnvelope>,
    #[serde(default, deserialize_with = "lenient")]
    pub outputs: Option<TaskOutput>,
    #[serde(default, deserialize_with = "lenient")]
    pub execution_status: Option<ExecutionStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub execution_meta: Option<BTreeMap<String, ExecutionNodeMeta>>,
}

impl JobDetail {
    /// Editor document, if every link of `workflow.extra_data.extra_pnginfo.workflow` is present.
    pub fn workflow_document(&self) -> Option<&Workflow> {
        self.workflow
            .as_ref()?
            .extra_data
            .as_ref()?
            .extra_pnginfo
            .as_ref()?
            .workflow
            .as_ref()
    }
}
