//! Validation result aggregator.
//!
//! Presents one whole-document [`ValidationResult`] and drives the
//! "Verify & Approve" submission with optional reviewer notes. The supplied
//! `validation_status` is rendered as-is; nothing here second-guesses it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docverify_core::confidence::{self, ConfidenceTier, Rgb};
use docverify_core::{DocumentId, ServiceError, ValidationResult, ValidationStatus, ValidationStore};
use tracing::{debug, info, warn};

use crate::error::{ReviewError, Target};
use crate::view::{ActionState, EntityRow};

/// Three-way status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub status: ValidationStatus,
    pub label: &'static str,
    pub color: Rgb,
}

impl From<ValidationStatus> for StatusBadge {
    fn from(status: ValidationStatus) -> Self {
        Self {
            status,
            label: status.label(),
            color: status.color(),
        }
    }
}

struct AggregatorState {
    open: bool,
    notes: String,
    submitting: bool,
}

pub struct ValidationReview<S: ValidationStore + ?Sized> {
    document_id: DocumentId,
    result: ValidationResult,
    store: Arc<S>,
    state: Mutex<AggregatorState>,
}

impl<S: ValidationStore + ?Sized> ValidationReview<S> {
    /// Fetch the validation result for a document.
    pub async fn load(document_id: DocumentId, store: Arc<S>) -> Result<Self, ReviewError> {
        info!(document_id, "loading validation result");
        let load_failure = |source| ReviewError::LoadFailure {
            what: "validation result",
            source,
        };
        let result = store
            .load_validation(document_id)
            .await
            .map_err(load_failure)?;
        result
            .validate()
            .map_err(|e| load_failure(ServiceError::Record(e)))?;
        info!(
            document_id,
            status = %result.validation_status,
            overall_confidence = result.overall_confidence,
            "validation result loaded"
        );
        Ok(Self::new(document_id, result, store))
    }

    /// Wrap a result the host already holds.
    pub fn new(document_id: DocumentId, result: ValidationResult, store: Arc<S>) -> Self {
        Self {
            document_id,
            result,
            store,
            state: Mutex::new(AggregatorState {
                open: true,
                notes: String::new(),
                submitting: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn status_badge(&self) -> StatusBadge {
        self.result.validation_status.into()
    }

    pub fn rows(&self) -> Vec<EntityRow> {
        self.result
            .entities()
            .into_iter()
            .map(|(label, entity)| EntityRow::from_entity(label, entity))
            .collect()
    }

    pub fn overall_tier(&self) -> ConfidenceTier {
        confidence::classify(self.result.overall_confidence)
    }

    pub fn overall_percent(&self) -> u8 {
        confidence::confidence_percent(self.result.overall_confidence)
    }

    /// Processing time in seconds with two decimals, e.g. `"1.50"`.
    pub fn processing_time_secs(&self) -> String {
        format!("{:.2}", self.result.processing_time_ms as f64 / 1000.0)
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        self.lock().notes = notes.into();
    }

    pub fn notes(&self) -> String {
        self.lock().notes.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn submit_action(&self) -> ActionState {
        if self.lock().submitting {
            ActionState {
                enabled: false,
                label: "Verifying...".into(),
            }
        } else {
            ActionState {
                enabled: true,
                label: "Verify & Approve".into(),
            }
        }
    }

    /// Submit the document-level verification with the current notes.
    ///
    /// Blank notes are sent as absent. Success closes the view; failure keeps
    /// it open with the notes intact for another attempt.
    pub async fn submit_verification(&self, verified_by: &str) -> Result<(), ReviewError> {
        let target = Target::Document(self.document_id);
        let notes = {
            let mut st = self.lock();
            if !st.open {
                return Err(ReviewError::Closed);
            }
            if st.submitting {
                debug!(document_id = self.document_id, "submission already in flight");
                return Err(ReviewError::AlreadyInFlight(target));
            }
            st.submitting = true;
            Some(st.notes.trim().to_string()).filter(|n| !n.is_empty())
        };

        info!(
            document_id = self.document_id,
            verified_by,
            has_notes = notes.is_some(),
            "submitting verification"
        );
        let outcome = self
            .store
            .submit_verification(self.document_id, verified_by, notes.as_deref())
            .await;

        let mut st = self.lock();
        st.submitting = false;
        match outcome {
            Ok(()) => {
                st.open = false;
                info!(document_id = self.document_id, "document verified");
                Ok(())
            }
            Err(source) => {
                warn!(document_id = self.document_id, error = %source, "verification failed");
                Err(ReviewError::VerifyFailure { target, source })
            }
        }
    }

    /// Dismiss the view without submitting.
    pub fn close(&self) {
        self.lock().open = false;
    }
}
