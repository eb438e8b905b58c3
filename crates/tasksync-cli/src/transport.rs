use std::io::Read;
use std::time::Duration;

use tasksync_core::models::{Operation, PromptId, SyncError, SyncErrorKind, SyncResult};
use tasksync_core::{Transport, TransportFuture, TransportResponse};

/// Blocking HTTP transport; requests run on tokio's blocking pool.
///
/// The agent's timeout is the only timeout applied to any request.
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

pub fn join_url(base_url: &str, path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

impl Transport for UreqTransport {
    fn fetch(&self, path: &str) -> TransportFuture<TransportResponse> {
        let agent = self.agent.clone();
        let url = self.url(path);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || collect(agent.get(&url).call()))
                .await
                .map_err(join_failure)?
        })
    }

    fn interrupt(&self, prompt_id: &PromptId) -> TransportFuture<()> {
        let agent = self.agent.clone();
        let url = self.url("/interrupt");
        let body = serde_json::json!({ "prompt_id": prompt_id }).to_string();
        Box::pin(async move {
            let response = tokio::task::spawn_blocking(move || {
                collect(
                    agent
                        .post(&url)
                        .set("Content-Type", "application/json")
                        .send_string(&body),
                )
            })
            .await
            .map_err(join_failure)??;

            if response.is_success() {
                Ok(())
            } else {
                Err(SyncError {
                    backend: None,
                    operation: Some(Operation::Interrupt),
                    kind: SyncErrorKind::Transport,
                    message: format!("interrupt rejected with status {}", response.status),
                })
            }
        })
    }
}

/// Error statuses are still responses; only connection-level failures are errors.
fn collect(result: Result<ureq::Response, ureq::Error>) -> SyncResult<TransportResponse> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(error)) => {
            return Err(SyncError::transport(error.to_string()));
        }
    };

    let status = response.status();
    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|error| SyncError::transport(format!("failed to read response body: {error}")))?;

    Ok(TransportResponse::new(status, body))
}

fn join_failure(error: tokio::task::JoinError) -> SyncError {
    SyncError::new(
        SyncErrorKind::Internal,
        format!("blocking request task failed: {error}"),
    )
}
