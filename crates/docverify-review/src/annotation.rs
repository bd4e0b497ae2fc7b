//! Annotation verification engine.
//!
//! An [`AnnotationReview`] owns one document's annotation set for the lifetime
//! of a review session. Reviewers select and verify entities; every
//! successful verify is followed by a full reload from the store, and the
//! reloaded set replaces the local one wholesale. Approval is gated on every
//! annotation being verified or corrected.
//!
//! Session state sits behind a mutex that is released before every store
//! call, so selection and verifies of other annotations stay available while
//! a verify is outstanding. At most one verify per annotation id is in flight.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docverify_core::{
    Annotation, AnnotationId, AnnotationStore, DocumentApprover, DocumentId, RenderScale,
};
use tracing::{debug, info, warn};

use crate::document::{document_url, normalize_document_path};
use crate::error::{ReviewError, Target};
use crate::view::{self, ActionState, EntityCard, OverlayItem, Progress};

/// Lifecycle of a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewPhase {
    Loading,
    Ready,
    /// Loading failed; only `retry_load` and `close` remain available.
    Error(String),
    /// The document reference was unusable; nothing was fetched.
    InvalidInput(String),
    Closed,
}

impl ReviewPhase {
    fn ensure_ready(&self) -> Result<(), ReviewError> {
        match self {
            Self::Ready => Ok(()),
            Self::Closed => Err(ReviewError::Closed),
            other => Err(ReviewError::NotReady(other.as_str())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error(_) => "error",
            Self::InvalidInput(_) => "invalid_input",
            Self::Closed => "closed",
        }
    }
}

struct SessionState {
    phase: ReviewPhase,
    annotations: Vec<Annotation>,
    selected: Option<AnnotationId>,
    in_flight: HashSet<AnnotationId>,
}

pub struct AnnotationReview<S: AnnotationStore + ?Sized> {
    document_id: DocumentId,
    /// Normalised path; `None` when the reference was invalid.
    document_path: Option<String>,
    store: Arc<S>,
    state: Mutex<SessionState>,
}

impl<S: AnnotationStore + ?Sized> AnnotationReview<S> {
    /// Open a review session and load its annotation set.
    ///
    /// An unusable document path puts the session in
    /// [`ReviewPhase::InvalidInput`] without touching the store. A failed load
    /// leaves it in [`ReviewPhase::Error`]. Either way the session is returned
    /// so the host can show the failure and close it.
    pub async fn open(document_id: DocumentId, document_path: Option<&str>, store: Arc<S>) -> Self {
        let (phase, document_path) = match normalize_document_path(document_path) {
            Ok(path) => (ReviewPhase::Loading, Some(path)),
            Err(e) => {
                warn!(document_id, error = %e, "refusing to open review");
                (ReviewPhase::InvalidInput(e.to_string()), None)
            }
        };
        let review = Self {
            document_id,
            document_path,
            store,
            state: Mutex::new(SessionState {
                phase,
                annotations: Vec::new(),
                selected: None,
                in_flight: HashSet::new(),
            }),
        };
        if review.phase() == ReviewPhase::Loading {
            // Failure is recorded in the phase.
            let _ = review.load().await;
        }
        review
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn load(&self) -> Result<(), ReviewError> {
        info!(document_id = self.document_id, "loading annotations");
        let loaded = self.store.load_annotations(self.document_id).await;

        let mut st = self.lock();
        if st.phase == ReviewPhase::Closed {
            debug!(document_id = self.document_id, "session closed, discarding load");
            return Err(ReviewError::Closed);
        }
        match loaded {
            Ok(annotations) => {
                info!(
                    document_id = self.document_id,
                    count = annotations.len(),
                    "annotations loaded"
                );
                st.annotations = annotations;
                st.phase = ReviewPhase::Ready;
                Ok(())
            }
            Err(source) => {
                let err = ReviewError::LoadFailure {
                    what: "annotations",
                    source,
                };
                warn!(document_id = self.document_id, error = %err, "annotation load failed");
                st.phase = ReviewPhase::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Reload after a load failure. Never called automatically.
    pub async fn retry_load(&self) -> Result<(), ReviewError> {
        {
            let mut st = self.lock();
            match &st.phase {
                ReviewPhase::Error(_) => {}
                ReviewPhase::Closed => return Err(ReviewError::Closed),
                other => return Err(ReviewError::NotReady(other.as_str())),
            }
            st.phase = ReviewPhase::Loading;
        }
        self.load().await
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Url of the document to hand to the page renderer.
    pub fn document_url(&self, api_url: &str) -> Option<String> {
        self.document_path
            .as_deref()
            .map(|path| document_url(api_url, path))
    }

    pub fn phase(&self) -> ReviewPhase {
        self.lock().phase.clone()
    }

    /// Snapshot of the current annotation set.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.lock().annotations.clone()
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<Annotation> {
        self.lock().annotations.iter().find(|a| a.id == id).cloned()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.lock().selected
    }

    /// Move the selection cursor. Statuses are untouched.
    pub fn select(&self, id: Option<AnnotationId>) {
        self.lock().selected = id;
    }

    pub fn is_verifying(&self, id: AnnotationId) -> bool {
        self.lock().in_flight.contains(&id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }

    /// Confirm an annotation as extracted, then reload the whole set.
    ///
    /// Verifies of different ids may run concurrently and complete in any
    /// order; each completion applies its own reload. A successful reload
    /// also recovers a session left in `Error` by a sibling's failed reload.
    pub async fn verify(&self, id: AnnotationId, verified_by: &str) -> Result<(), ReviewError> {
        {
            let mut st = self.lock();
            st.phase.ensure_ready()?;
            let ann = st
                .annotations
                .iter()
                .find(|a| a.id == id)
                .ok_or(ReviewError::NotFound(id))?;
            if ann.is_done() {
                return Err(ReviewError::AlreadyConfirmed {
                    id,
                    status: ann.status.as_str(),
                });
            }
            if !st.in_flight.insert(id) {
                debug!(annotation_id = id, "verify already in flight");
                return Err(ReviewError::AlreadyInFlight(Target::Annotation(id)));
            }
        }

        info!(annotation_id = id, verified_by, "verifying annotation");
        if let Err(source) = self.store.verify_annotation(id, verified_by).await {
            self.lock().in_flight.remove(&id);
            warn!(annotation_id = id, error = %source, "verify failed");
            return Err(ReviewError::VerifyFailure {
                target: Target::Annotation(id),
                source,
            });
        }

        let reloaded = self.store.load_annotations(self.document_id).await;

        let mut st = self.lock();
        st.in_flight.remove(&id);
        if st.phase == ReviewPhase::Closed {
            debug!(annotation_id = id, "session closed, discarding reload");
            return Err(ReviewError::Closed);
        }
        match reloaded {
            Ok(annotations) => {
                if st.phase != ReviewPhase::Ready {
                    info!(
                        annotation_id = id,
                        phase = st.phase.as_str(),
                        "reload after verify recovered the session"
                    );
                    st.phase = ReviewPhase::Ready;
                }
                if st
                    .selected
                    .is_some_and(|sel| !annotations.iter().any(|a| a.id == sel))
                {
                    st.selected = None;
                }
                st.annotations = annotations;
                info!(annotation_id = id, "annotation verified");
                Ok(())
            }
            Err(source) => {
                let err = ReviewError::LoadFailure {
                    what: "annotations",
                    source,
                };
                warn!(document_id = self.document_id, error = %err, "reload after verify failed");
                st.phase = ReviewPhase::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// True iff the set is non-empty and fully verified or corrected.
    pub fn approval_gate(&self) -> bool {
        docverify_core::approval_gate(&self.lock().annotations)
    }

    pub fn approval_action(&self) -> ActionState {
        view::approval_action(&self.lock().annotations)
    }

    /// Hand the approved document to the host's approver.
    pub async fn approve(&self, approver: &dyn DocumentApprover) -> Result<(), ReviewError> {
        {
            let st = self.lock();
            st.phase.ensure_ready()?;
            if !docverify_core::approval_gate(&st.annotations) {
                return Err(ReviewError::ApprovalBlocked {
                    remaining: docverify_core::remaining(&st.annotations),
                    total: st.annotations.len(),
                });
            }
        }
        approver
            .approve(self.document_id)
            .await
            .map_err(ReviewError::Approval)?;
        info!(document_id = self.document_id, "document approved");
        Ok(())
    }

    pub fn progress(&self) -> Progress {
        view::progress(&self.lock().annotations)
    }

    /// Overlay rectangles for `page` at `scale`.
    pub fn overlay(&self, page: u32, scale: RenderScale) -> Vec<OverlayItem> {
        let st = self.lock();
        view::overlay(&st.annotations, page, scale, st.selected)
    }

    pub fn cards(&self) -> Vec<EntityCard> {
        let st = self.lock();
        view::cards(&st.annotations, st.selected, &st.in_flight)
    }

    /// End the session. Completions still in flight are discarded.
    pub fn close(&self) {
        let mut st = self.lock();
        if st.phase != ReviewPhase::Closed {
            info!(document_id = self.document_id, "closing review");
        }
        st.phase = ReviewPhase::Closed;
        st.annotations.clear();
        st.selected = None;
    }
}
