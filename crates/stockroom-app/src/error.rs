// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("cannot reach {0}")]
    Unavailable(String),
    #[error("server error ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl RemoteError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("cannot reach {0} -- check [server].base_url and that the server is running, then retry")]
    RemoteUnavailable(String),
    #[error("server rejected the request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },
    #[error("record {0} is not in the current list -- reload and retry")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no record is open for editing")]
    NoPendingEdit,
    #[error("change was saved but the list reload failed: {0}")]
    RefreshFailed(Box<ListError>),
    #[error("list view is closed")]
    Closed,
}

impl From<RemoteError> for ListError {
    fn from(value: RemoteError) -> Self {
        match value {
            RemoteError::Unavailable(message) => Self::RemoteUnavailable(message),
            RemoteError::Rejected { status, message } => Self::RemoteRejected { status, message },
        }
    }
}
