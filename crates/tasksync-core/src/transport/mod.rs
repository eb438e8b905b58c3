use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;

use crate::models::{PromptId, SyncError, SyncResult};

#[cfg(test)]
pub(crate) mod fixture;

pub type TransportFuture<T> = Pin<Box<dyn Future<Output = SyncResult<T>> + Send>>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> SyncResult<T> {
        serde_json::from_slice(&self.body).map_err(|error| {
            SyncError::parse(format!(
                "invalid JSON body (status {}): {error}",
                self.status
            ))
        })
    }

    /// Parses the body only for 2xx responses.
    pub fn success_json<T: DeserializeOwned>(&self) -> SyncResult<T> {
        if !self.is_success() {
            return Err(SyncError::transport(format!(
                "unexpected response status {}",
                self.status
            )));
        }
        self.json()
    }
}

/// The request capability the fetchers are written against.
///
/// Paths are relative to the API root and already carry their query string,
/// e.g. `/jobs?status=in_progress,pending&limit=200&offset=0`. Implementations
/// must send them verbatim: the comma-joined status list must not be
/// percent-encoded.
pub trait Transport: Send + Sync {
    fn fetch(&self, path: &str) -> TransportFuture<TransportResponse>;

    /// Asks the backend to interrupt the running task `prompt_id`.
    fn interrupt(&self, prompt_id: &PromptId) -> TransportFuture<()>;
}
