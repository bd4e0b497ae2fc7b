use thiserror::Error;

use crate::geometry::BoundingBox;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("render scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("bounding box has non-finite components: {0:?}")]
    NonFinite(BoundingBox),

    #[error("bounding box has negative extent: {0:?}")]
    NegativeExtent(BoundingBox),
}

/// A wire record that cannot be turned into a core type.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("annotation {id}: confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { id: u64, value: f64 },

    #[error("annotation {id}: page number must be 1-based")]
    ZeroPage { id: u64 },

    #[error("annotation {id}: {source}")]
    Geometry {
        id: u64,
        #[source]
        source: GeometryError,
    },

    #[error("annotation {id}: unknown status {status:?}")]
    UnknownStatus { id: u64, status: String },

    #[error("annotation {id}: {detail}")]
    StatusMismatch { id: u64, detail: &'static str },

    #[error("annotation {id}: invalid verified_at {value:?}")]
    Timestamp { id: u64, value: String },

    #[error("validation entity {field}: confidence {value} outside [0, 1]")]
    EntityConfidence { field: &'static str, value: f64 },

    #[error("duplicate annotation id {0}")]
    DuplicateId(u64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("api url must not be empty")]
    EmptyApiUrl,

    #[error("api url must start with http:// or https://, got {0:?}")]
    ApiUrlScheme(String),

    #[error("verified_by must not be empty")]
    EmptyVerifier,

    #[error(transparent)]
    Scale(#[from] GeometryError),
}
