//! Interfaces to the remote review service.
//!
//! The review engine only talks to these traits; `docverify-sync` provides
//! the HTTP implementation and tests use in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::annotation::{Annotation, AnnotationId, DocumentId};
use crate::error::RecordError;
use crate::validation::ValidationResult;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("malformed record: {0}")]
    Record(#[from] RecordError),
}

/// Remote store holding a document's annotation set.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Fetch the full, validated annotation set for a document.
    async fn load_annotations(&self, document_id: DocumentId)
    -> Result<Vec<Annotation>, ServiceError>;

    /// Confirm one annotation as extracted.
    async fn verify_annotation(
        &self,
        annotation_id: AnnotationId,
        verified_by: &str,
    ) -> Result<(), ServiceError>;
}

/// Remote source of whole-document validation results.
#[async_trait]
pub trait ValidationStore: Send + Sync {
    async fn load_validation(&self, document_id: DocumentId)
    -> Result<ValidationResult, ServiceError>;

    /// Confirm the document's extraction, with optional reviewer notes.
    async fn submit_verification(
        &self,
        document_id: DocumentId,
        verified_by: &str,
        notes: Option<&str>,
    ) -> Result<(), ServiceError>;
}

/// Receives the "approve document" action once every annotation is confirmed.
#[async_trait]
pub trait DocumentApprover: Send + Sync {
    async fn approve(&self, document_id: DocumentId) -> Result<(), ServiceError>;
}
