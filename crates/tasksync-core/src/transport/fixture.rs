use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{PromptId, SyncError};
use crate::transport::{Transport, TransportFuture, TransportResponse};

enum Route {
    Respond(TransportResponse),
    Fail,
}

/// Serves canned responses keyed by exact request path and records every call.
/// Unrouted paths answer 404.
#[derive(Default)]
pub(crate) struct FixtureTransport {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
    interrupts: Mutex<Vec<PromptId>>,
}

impl FixtureTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::Respond(TransportResponse::new(status, body)),
        );
        self
    }

    pub(crate) fn fail(mut self, path: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Fail);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn interrupts(&self) -> Vec<PromptId> {
        self.interrupts.lock().unwrap().clone()
    }
}

impl Transport for FixtureTransport {
    fn fetch(&self, path: &str) -> TransportFuture<TransportResponse> {
        self.requests.lock().unwrap().push(path.to_string());
        let result = match self.routes.get(path) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail) => Err(SyncError::transport("connection refused")),
            None => Ok(TransportResponse::new(404, r#"{"error":"not found"}"#)),
        };
        Box::pin(async move { result })
    }

    fn interrupt(&self, prompt_id: &PromptId) -> TransportFuture<()> {
        self.interrupts.lock().unwrap().push(prompt_id.clone());
        Box::pin(async { Ok(()) })
    }
}
