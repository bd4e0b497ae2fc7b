//! HTTP client for the review service's annotation and validation endpoints.

use async_trait::async_trait;
use docverify_core::{
    Annotation, AnnotationId, AnnotationRecord, AnnotationStore, DocumentId, ReviewConfig,
    ServiceError, ValidationResult, ValidationStore, parse_annotation_set,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SyncError> for ServiceError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Http(e) if e.is_decode() => ServiceError::Malformed(e.to_string()),
            SyncError::Http(e) => ServiceError::Transport(e.to_string()),
            SyncError::Server { status, body } => ServiceError::Server { status, body },
            SyncError::Json(e) => ServiceError::Malformed(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct VerifyAnnotationBody<'a> {
    verified_by: &'a str,
}

#[derive(Serialize)]
struct VerifyDocumentBody<'a> {
    verified_by: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

/// HTTP client for the review service.
pub struct ReviewClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReviewClient {
    /// Create a client for the given base URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn annotations_url(&self, document_id: DocumentId) -> String {
        format!("{}/api/documents/{document_id}/annotations", self.base_url)
    }

    fn verify_annotation_url(&self, annotation_id: AnnotationId) -> String {
        format!(
            "{}/api/documents/annotations/{annotation_id}/verify",
            self.base_url
        )
    }

    fn validation_url(&self, document_id: DocumentId) -> String {
        format!(
            "{}/api/documents/{document_id}/enhanced-validation",
            self.base_url
        )
    }

    fn verify_document_url(&self, document_id: DocumentId) -> String {
        format!("{}/api/documents/{document_id}/verify", self.base_url)
    }

    /// Fetch the raw annotation records for a document.
    pub async fn fetch_annotations(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<AnnotationRecord>, SyncError> {
        let url = self.annotations_url(document_id);
        info!(url = %url, "fetching annotations");
        let resp = check(self.client.get(&url).send().await?).await?;
        let bytes = resp.bytes().await?;
        let records: Vec<AnnotationRecord> = serde_json::from_slice(&bytes)?;
        info!(document_id, count = records.len(), "fetched annotations");
        Ok(records)
    }

    pub async fn put_annotation_verified(
        &self,
        annotation_id: AnnotationId,
        verified_by: &str,
    ) -> Result<(), SyncError> {
        let url = self.verify_annotation_url(annotation_id);
        debug!(url = %url, verified_by, "verifying annotation");
        let body = VerifyAnnotationBody { verified_by };
        check(self.client.put(&url).json(&body).send().await?).await?;
        info!(annotation_id, "annotation verified");
        Ok(())
    }

    pub async fn fetch_validation(
        &self,
        document_id: DocumentId,
    ) -> Result<ValidationResult, SyncError> {
        let url = self.validation_url(document_id);
        info!(url = %url, "fetching enhanced validation");
        let resp = check(self.client.get(&url).send().await?).await?;
        let bytes = resp.bytes().await?;
        let result: ValidationResult = serde_json::from_slice(&bytes)?;
        info!(
            document_id,
            status = %result.validation_status,
            overall_confidence = result.overall_confidence,
            "fetched enhanced validation"
        );
        Ok(result)
    }

    pub async fn post_document_verified(
        &self,
        document_id: DocumentId,
        verified_by: &str,
        notes: Option<&str>,
    ) -> Result<(), SyncError> {
        let url = self.verify_document_url(document_id);
        debug!(url = %url, verified_by, has_notes = notes.is_some(), "verifying document");
        let body = VerifyDocumentBody { verified_by, notes };
        check(self.client.post(&url).json(&body).send().await?).await?;
        info!(document_id, "document verified");
        Ok(())
    }
}

/// Turn a non-2xx response into `SyncError::Server`, keeping the body.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SyncError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

#[async_trait]
impl AnnotationStore for ReviewClient {
    async fn load_annotations(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<Annotation>, ServiceError> {
        let records = self.fetch_annotations(document_id).await?;
        Ok(parse_annotation_set(records)?)
    }

    async fn verify_annotation(
        &self,
        annotation_id: AnnotationId,
        verified_by: &str,
    ) -> Result<(), ServiceError> {
        Ok(self.put_annotation_verified(annotation_id, verified_by).await?)
    }
}

#[async_trait]
impl ValidationStore for ReviewClient {
    async fn load_validation(
        &self,
        document_id: DocumentId,
    ) -> Result<ValidationResult, ServiceError> {
        Ok(self.fetch_validation(document_id).await?)
    }

    async fn submit_verification(
        &self,
        document_id: DocumentId,
        verified_by: &str,
        notes: Option<&str>,
    ) -> Result<(), ServiceError> {
        Ok(self
            .post_document_verified(document_id, verified_by, notes)
            .await?)
    }
}
