//! Review sessions: annotation verification and whole-document validation.

pub mod annotation;
pub mod document;
mod error;
pub mod validation;
pub mod view;

#[cfg(test)]
mod testing;

pub use annotation::{AnnotationReview, ReviewPhase};
pub use document::{document_url, normalize_document_path};
pub use error::{ReviewError, Target};
pub use validation::{StatusBadge, ValidationReview};
pub use view::{ActionState, EntityCard, EntityRow, OverlayItem, OverlayState, Progress};
