pub mod annotation;
pub mod config;
pub mod confidence;
pub mod error;
pub mod geometry;
pub mod labels;
pub mod service;
pub mod validation;

pub use annotation::{
    Annotation, AnnotationId, AnnotationRecord, AnnotationStatus, Attribution, DocumentId,
    approval_gate, parse_annotation_set, remaining,
};
pub use confidence::{ConfidenceTier, Rgb, classify, confidence_percent};
pub use config::ReviewConfig;
pub use error::{ConfigError, GeometryError, RecordError};
pub use geometry::{BoundingBox, RenderRect, RenderScale, map_to_render};
pub use labels::entity_label;
pub use service::{AnnotationStore, DocumentApprover, ServiceError, ValidationStore};
pub use validation::{ExtractedEntity, ValidationResult, ValidationStatus};
