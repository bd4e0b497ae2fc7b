//! Whole-document validation outcome produced by the extraction service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::confidence::Rgb;
use crate::error::RecordError;

/// One extracted field compared against what onboarding expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub expected_value: Option<String>,
    pub confidence: f64,
    /// Supplied upstream; never recomputed here.
    pub matches_expected: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl ExtractedEntity {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn is_mismatch(&self) -> bool {
        !self.matches_expected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Verified,
    NeedsReview,
    Failed,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::NeedsReview => "needs_review",
            Self::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Verified => "Verified",
            Self::NeedsReview => "Needs Review",
            Self::Failed => "Failed",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Verified => Rgb::GREEN,
            Self::NeedsReview => Rgb::AMBER,
            Self::Failed => Rgb::BRIGHT_RED,
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of `GET /api/documents/{id}/enhanced-validation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub legal_name: ExtractedEntity,
    pub country_of_incorporation: ExtractedEntity,
    pub entity_type: ExtractedEntity,
    pub document_type: ExtractedEntity,
    pub issue_date: ExtractedEntity,
    pub expiry_date: ExtractedEntity,
    pub signatory: ExtractedEntity,
    pub document_reference: ExtractedEntity,
    pub overall_confidence: f64,
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl ValidationResult {
    /// The eight entity slots in display order, with their row labels.
    pub fn entities(&self) -> [(&'static str, &ExtractedEntity); 8] {
        [
            ("Legal Name", &self.legal_name),
            ("Country of Incorporation", &self.country_of_incorporation),
            ("Entity Type", &self.entity_type),
            ("Document Type", &self.document_type),
            ("Issue Date", &self.issue_date),
            ("Expiry Date", &self.expiry_date),
            ("Signatory", &self.signatory),
            ("Document Ref", &self.document_reference),
        ]
    }

    /// Reject confidence values outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RecordError> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(self.overall_confidence) {
            return Err(RecordError::EntityConfidence {
                field: "overall_confidence",
                value: self.overall_confidence,
            });
        }
        for (field, entity) in self.entities() {
            if !in_range(entity.confidence) {
                return Err(RecordError::EntityConfidence {
                    field,
                    value: entity.confidence,
                });
            }
        }
        Ok(())
    }
}
