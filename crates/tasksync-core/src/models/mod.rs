pub mod backend;
pub mod error;
pub mod job;
pub mod output;
pub mod task;

pub use backend::{Backend, Operation};
pub use error::{SyncError, SyncErrorKind, SyncResult};
pub use job::{
    ExecutionNodeMeta, ExecutionStatus, JobDetail, JobStatus, JobSummary, JobsListResponse,
    JobsPage, PngInfo, Workflow, WorkflowEnvelope, WorkflowExtraData,
};
pub use output::{NodeOutput, PreviewOutput, ResultItem, ResultItemType, TaskOutput};
pub use task::{
    CancelCallback, CancelFuture, ExtraData, HistoryResponse, HistoryTask, NodeId, NodeInputs,
    PendingTask, PromptId, QueueResponse, RemoveAction, RunningTask, StatusFlag, StatusMessage,
    TaskItem, TaskPrompt, TaskStatus, TaskType,
};
