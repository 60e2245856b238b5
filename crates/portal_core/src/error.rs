use std::fmt;

use thiserror::Error;

use crate::ExportKind;

/// Why a remote call failed, as far as the state machines care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailureKind {
    /// Transport unreachable or timed out.
    NetworkFailure,
    /// Envelope shape not recognized.
    MalformedResponse,
    /// The server answered with a non-success status.
    Rejected(u16),
    ExportFailed(ExportKind),
}

impl fmt::Display for RemoteFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFailureKind::NetworkFailure => write!(f, "network failure"),
            RemoteFailureKind::MalformedResponse => write!(f, "malformed response"),
            RemoteFailureKind::Rejected(status) => write!(f, "rejected with status {status}"),
            RemoteFailureKind::ExportFailed(kind) => write!(f, "export of {kind} failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RemoteFailure {
    pub kind: RemoteFailureKind,
    pub message: String,
}

impl RemoteFailure {
    pub fn new(kind: RemoteFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("page {requested} is outside 1..={total_pages}")]
    InvalidPage { requested: u32, total_pages: u32 },
    #[error("a job is already running")]
    JobAlreadyRunning,
}
