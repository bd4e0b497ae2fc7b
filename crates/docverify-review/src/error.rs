use std::fmt;

use docverify_core::{AnnotationId, DocumentId, ServiceError};
use thiserror::Error;

/// What a verify call was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Annotation(AnnotationId),
    Document(DocumentId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Annotation(id) => write!(f, "annotation {id}"),
            Self::Document(id) => write!(f, "document {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReviewError {
    /// Loading (or reloading) the annotation set or validation result failed.
    #[error("failed to load {what}: {source}")]
    LoadFailure {
        what: &'static str,
        #[source]
        source: ServiceError,
    },

    /// Missing or malformed document reference; no network call was made.
    #[error("invalid document reference: {0}")]
    InvalidInput(String),

    #[error("verification of {target} failed: {source}")]
    VerifyFailure {
        target: Target,
        #[source]
        source: ServiceError,
    },

    #[error("verification of {0} is already in flight")]
    AlreadyInFlight(Target),

    #[error("annotation {0} not found")]
    NotFound(AnnotationId),

    #[error("annotation {id} is already {status}")]
    AlreadyConfirmed {
        id: AnnotationId,
        status: &'static str,
    },

    #[error("review session is {0}")]
    NotReady(&'static str),

    #[error("review session is closed")]
    Closed,

    #[error("approval blocked: {remaining} of {total} entities still pending")]
    ApprovalBlocked { remaining: usize, total: usize },

    #[error("approval failed: {0}")]
    Approval(#[source] ServiceError),
}

impl ReviewError {
    /// Rejections that need no user-facing alarm.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyInFlight(_))
    }

    /// Errors that take the whole session down rather than a single action.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LoadFailure { .. } | Self::InvalidInput(_))
    }
}
