use thiserror::Error;

use crate::models::{Backend, Operation};

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SyncErrorKind {
    Transport,
    NotFound,
    ParseFailure,
    InvalidInput,
    Internal,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct SyncError {
    pub backend: Option<Backend>,
    pub operation: Option<Operation>,
    pub kind: SyncErrorKind,
    pub message: String,
}

impl SyncError {
    pub fn new(kind: SyncErrorKind, message: impl Into<String>) -> Self {
        Self {
            backend: None,
            operation: None,
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::Transport, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::ParseFailure, message)
    }

    /// Fills in attribution that the producer of the error did not know about.
    /// Attribution already present is kept.
    pub fn attributed(mut self, backend: Backend, operation: Operation) -> Self {
        self.backend.get_or_insert(backend);
        self.operation.get_or_insert(operation);
        self
    }
}
