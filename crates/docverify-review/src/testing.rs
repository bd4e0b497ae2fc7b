//! In-memory collaborators and fixtures for review tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use docverify_core::{
    Annotation, AnnotationId, AnnotationStatus, AnnotationStore, Attribution, BoundingBox,
    DocumentApprover, DocumentId, ExtractedEntity, ServiceError, ValidationResult,
    ValidationStatus, ValidationStore,
};
use tokio::sync::oneshot;

pub fn pending(id: AnnotationId) -> Annotation {
    Annotation {
        id,
        entity_type: "legal_name".into(),
        entity_label: "Client Name".into(),
        extracted_value: "GLOBAL TRADE SOLUTIONS PTE LTD".into(),
        confidence: 0.93,
        page_number: 1,
        bounding_box: BoundingBox::new(120.0, 245.0 + id as f64 * 40.0, 350.0, 25.0),
        status: AnnotationStatus::Pending,
    }
}

pub fn verified(id: AnnotationId) -> Annotation {
    Annotation {
        status: AnnotationStatus::Verified(Attribution {
            verified_by: "Demo User".into(),
            verified_at: Utc::now(),
        }),
        ..pending(id)
    }
}

pub fn entity(value: &str, confidence: f64) -> ExtractedEntity {
    ExtractedEntity {
        value: value.into(),
        expected_value: None,
        confidence,
        matches_expected: true,
        issues: Vec::new(),
    }
}

pub fn result(status: ValidationStatus) -> ValidationResult {
    ValidationResult {
        legal_name: entity("GLOBAL TRADE SOLUTIONS PTE LTD", 0.96),
        country_of_incorporation: entity("Singapore", 0.94),
        entity_type: entity("Private Limited Company", 0.91),
        document_type: entity("Certificate of Incorporation", 0.97),
        issue_date: entity("15 June 2023", 0.89),
        expiry_date: entity("15 June 2026", 0.82),
        signatory: ExtractedEntity {
            issues: vec!["Signature not found".into()],
            ..entity("", 0.40)
        },
        document_reference: ExtractedEntity {
            expected_value: Some("RC-2024-99999".into()),
            matches_expected: false,
            ..entity("RC-2024-12345", 0.93)
        },
        overall_confidence: 0.87,
        validation_status: status,
        issues: Vec::new(),
        warnings: vec!["Signatory not detected".into()],
        recommendations: vec!["Request a signed copy".into()],
        processing_time_ms: 1500,
    }
}

type Gate = oneshot::Receiver<Result<(), ServiceError>>;

/// Server-side annotation state plus hooks to delay or fail calls.
#[derive(Default)]
pub struct FakeAnnotationStore {
    server: Mutex<Vec<Annotation>>,
    gates: Mutex<HashMap<AnnotationId, Gate>>,
    failing_verifies: Mutex<HashSet<AnnotationId>>,
    fail_loads: AtomicBool,
    pub loads: AtomicUsize,
    pub verifies: AtomicUsize,
}

impl FakeAnnotationStore {
    pub fn with(annotations: Vec<Annotation>) -> Self {
        Self {
            server: Mutex::new(annotations),
            ..Default::default()
        }
    }

    /// Hold the next verify of `id` until the returned sender fires.
    pub fn gate(&self, id: AnnotationId) -> oneshot::Sender<Result<(), ServiceError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(id, rx);
        tx
    }

    pub fn fail_verify(&self, id: AnnotationId) {
        self.failing_verifies.lock().unwrap().insert(id);
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }

    /// Mutate the server-side set directly, as another reviewer would.
    pub fn set_server(&self, annotations: Vec<Annotation>) {
        *self.server.lock().unwrap() = annotations;
    }
}

#[async_trait]
impl AnnotationStore for FakeAnnotationStore {
    async fn load_annotations(
        &self,
        _document_id: DocumentId,
    ) -> Result<Vec<Annotation>, ServiceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(ServiceError::Server {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self.server.lock().unwrap().clone())
    }

    async fn verify_annotation(
        &self,
        annotation_id: AnnotationId,
        verified_by: &str,
    ) -> Result<(), ServiceError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(&annotation_id);
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| ServiceError::Transport("gate dropped".into()))??;
        }
        if self.failing_verifies.lock().unwrap().contains(&annotation_id) {
            return Err(ServiceError::Server {
                status: 500,
                body: "verify failed".into(),
            });
        }
        let mut server = self.server.lock().unwrap();
        let ann = server
            .iter_mut()
            .find(|a| a.id == annotation_id)
            .ok_or_else(|| ServiceError::Server {
                status: 404,
                body: "not found".into(),
            })?;
        ann.status = AnnotationStatus::Verified(Attribution {
            verified_by: verified_by.to_string(),
            verified_at: Utc::now(),
        });
        Ok(())
    }
}

pub struct FakeValidationStore {
    result: Mutex<Option<ValidationResult>>,
    gate: Mutex<Option<Gate>>,
    fail_submit: AtomicBool,
    pub submissions: Mutex<Vec<(DocumentId, String, Option<String>)>>,
}

impl FakeValidationStore {
    pub fn with(result: Option<ValidationResult>) -> Self {
        Self {
            result: Mutex::new(result),
            gate: Mutex::new(None),
            fail_submit: AtomicBool::new(false),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn gate(&self) -> oneshot::Sender<Result<(), ServiceError>> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<(DocumentId, String, Option<String>)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ValidationStore for FakeValidationStore {
    async fn load_validation(
        &self,
        _document_id: DocumentId,
    ) -> Result<ValidationResult, ServiceError> {
        self.result
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ServiceError::Server {
                status: 404,
                body: "no validation".into(),
            })
    }

    async fn submit_verification(
        &self,
        document_id: DocumentId,
        verified_by: &str,
        notes: Option<&str>,
    ) -> Result<(), ServiceError> {
        self.submissions.lock().unwrap().push((
            document_id,
            verified_by.to_string(),
            notes.map(str::to_string),
        ));
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| ServiceError::Transport("gate dropped".into()))??;
        }
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection reset".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingApprover {
    pub approved: Mutex<Vec<DocumentId>>,
}

#[async_trait]
impl DocumentApprover for RecordingApprover {
    async fn approve(&self, document_id: DocumentId) -> Result<(), ServiceError> {
        self.approved.lock().unwrap().push(document_id);
        Ok(())
    }
}
