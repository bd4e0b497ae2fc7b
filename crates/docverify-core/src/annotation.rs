//! AI-extracted entity annotations and their verification status.
//!
//! [`Annotation`] is the in-core representation: its status is an enum whose
//! variants carry exactly the data that exists in that state, so a corrected
//! value or an attribution can never be attached to a pending annotation.
//! [`AnnotationRecord`] is the flat wire shape served by the review service and
//! is converted with validation at the boundary.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::confidence::{self, ConfidenceTier};
use crate::error::RecordError;
use crate::geometry::BoundingBox;

pub type AnnotationId = u64;
pub type DocumentId = u64;

/// Who confirmed an annotation, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub verified_by: String,
    pub verified_at: DateTime<Utc>,
}

/// Verification state of one annotation.
///
/// `Pending` transitions once, to either `Verified` or `Corrected`; both are
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationStatus {
    Pending,
    /// Confirmed as extracted.
    Verified(Attribution),
    /// Confirmed with an edited value.
    Corrected {
        corrected_value: String,
        attribution: Attribution,
    },
}

impl AnnotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified(_) => "verified",
            Self::Corrected { .. } => "corrected",
        }
    }

    /// Verified or corrected.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn attribution(&self) -> Option<&Attribution> {
        match self {
            Self::Pending => None,
            Self::Verified(a) => Some(a),
            Self::Corrected { attribution, .. } => Some(attribution),
        }
    }

    pub fn corrected_value(&self) -> Option<&str> {
        match self {
            Self::Corrected {
                corrected_value, ..
            } => Some(corrected_value),
            _ => None,
        }
    }
}

/// One AI-extracted entity instance, positioned on a document page.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub entity_type: String,
    pub entity_label: String,
    /// Empty when the extractor found nothing.
    pub extracted_value: String,
    pub confidence: f64,
    /// 1-based.
    pub page_number: u32,
    pub bounding_box: BoundingBox,
    pub status: AnnotationStatus,
}

impl Annotation {
    pub fn tier(&self) -> ConfidenceTier {
        confidence::classify(self.confidence)
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// The value a reviewer signed off on: the correction if there is one.
    pub fn effective_value(&self) -> &str {
        self.status
            .corrected_value()
            .unwrap_or(&self.extracted_value)
    }
}

/// Annotation as served by `GET /api/documents/{id}/annotations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub entity_type: String,
    pub entity_label: String,
    #[serde(default)]
    pub extracted_value: String,
    pub confidence: f64,
    pub page_number: u32,
    pub bounding_box: BoundingBox,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    /// ISO 8601 timestamp string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = RecordError;

    fn try_from(rec: AnnotationRecord) -> Result<Self, Self::Error> {
        let id = rec.id;
        if !(0.0..=1.0).contains(&rec.confidence) {
            return Err(RecordError::ConfidenceOutOfRange {
                id,
                value: rec.confidence,
            });
        }
        if rec.page_number == 0 {
            return Err(RecordError::ZeroPage { id });
        }
        rec.bounding_box
            .validate()
            .map_err(|source| RecordError::Geometry { id, source })?;

        let status = parse_status(
            id,
            &rec.status,
            rec.corrected_value,
            rec.verified_by,
            rec.verified_at,
        )?;

        Ok(Annotation {
            id,
            entity_type: rec.entity_type,
            entity_label: rec.entity_label,
            extracted_value: rec.extracted_value,
            confidence: rec.confidence,
            page_number: rec.page_number,
            bounding_box: rec.bounding_box,
            status,
        })
    }
}

const PENDING_STATUS: &str = "pending";
/// Status the review service assigns to freshly extracted annotations.
const AUTO_EXTRACTED_STATUS: &str = "auto_extracted";

fn parse_status(
    id: AnnotationId,
    status: &str,
    corrected_value: Option<String>,
    verified_by: Option<String>,
    verified_at: Option<String>,
) -> Result<AnnotationStatus, RecordError> {
    let mismatch = |detail| RecordError::StatusMismatch { id, detail };

    let confirmed = match status {
        PENDING_STATUS | AUTO_EXTRACTED_STATUS => {
            if corrected_value.is_some() {
                return Err(mismatch("pending annotation carries a corrected value"));
            }
            if verified_by.is_some() || verified_at.is_some() {
                return Err(mismatch("pending annotation carries an attribution"));
            }
            return Ok(AnnotationStatus::Pending);
        }
        "verified" => false,
        "corrected" => true,
        other => {
            return Err(RecordError::UnknownStatus {
                id,
                status: other.to_string(),
            });
        }
    };

    let attribution = match (verified_by, verified_at) {
        (Some(by), Some(at)) if !by.trim().is_empty() => Attribution {
            verified_by: by,
            verified_at: parse_timestamp(id, &at)?,
        },
        _ => return Err(mismatch("confirmed annotation is missing its attribution")),
    };

    match (confirmed, corrected_value) {
        (false, None) => Ok(AnnotationStatus::Verified(attribution)),
        (false, Some(_)) => Err(mismatch("verified annotation carries a corrected value")),
        (true, Some(corrected_value)) => Ok(AnnotationStatus::Corrected {
            corrected_value,
            attribution,
        }),
        (true, None) => Err(mismatch("corrected annotation is missing its corrected value")),
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 one assumed to be UTC.
fn parse_timestamp(id: AnnotationId, value: &str) -> Result<DateTime<Utc>, RecordError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::Timestamp {
            id,
            value: value.to_string(),
        })
}

/// Validate a whole annotation set, preserving order.
///
/// Any malformed record rejects the set; ids must be unique.
pub fn parse_annotation_set(
    records: Vec<AnnotationRecord>,
) -> Result<Vec<Annotation>, RecordError> {
    let mut seen = HashSet::with_capacity(records.len());
    let parsed: Result<Vec<Annotation>, RecordError> = records
        .into_iter()
        .map(|rec| {
            if !seen.insert(rec.id) {
                return Err(RecordError::DuplicateId(rec.id));
            }
            Annotation::try_from(rec)
        })
        .collect();
    if let Err(e) = &parsed {
        warn!(error = %e, "rejected annotation set");
    }
    parsed
}

/// Approval gate: the set is non-empty and every annotation is verified or
/// corrected.
pub fn approval_gate(set: &[Annotation]) -> bool {
    !set.is_empty() && set.iter().all(Annotation::is_done)
}

/// Number of annotations still pending.
pub fn remaining(set: &[Annotation]) -> usize {
    set.iter().filter(|a| !a.is_done()).count()
}
