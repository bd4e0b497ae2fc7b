//! Declarative view state derived from the review sessions.
//!
//! Everything here is a pure function of session state: colors, labels and
//! button states are recomputed on demand, never mutated in place.

use std::collections::HashSet;

use docverify_core::confidence::{self, ConfidenceTier, Rgb};
use docverify_core::labels;
use docverify_core::{Annotation, AnnotationId, ExtractedEntity, RenderRect, RenderScale, map_to_render};

pub const NOT_DETECTED: &str = "Not detected";

/// Enabled state and label of a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub verified: usize,
    pub total: usize,
    /// Rounded; 0 for an empty set.
    pub percent: u8,
}

pub fn progress(set: &[Annotation]) -> Progress {
    let total = set.len();
    let verified = set.iter().filter(|a| a.is_done()).count();
    let percent = if total == 0 {
        0
    } else {
        ((verified as f64 / total as f64) * 100.0).round() as u8
    };
    Progress {
        verified,
        total,
        percent,
    }
}

/// The "Approve Document" button.
pub fn approval_action(set: &[Annotation]) -> ActionState {
    if docverify_core::approval_gate(set) {
        ActionState {
            enabled: true,
            label: "Approve Document".into(),
        }
    } else {
        ActionState {
            enabled: false,
            label: format!(
                "Verify all entities to approve ({} remaining)",
                docverify_core::remaining(set)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Selected,
    Verified,
    Pending(ConfidenceTier),
}

/// One highlight rectangle to draw over the rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    pub id: AnnotationId,
    pub rect: RenderRect,
    pub state: OverlayState,
    pub border: Rgb,
    pub tooltip: String,
}

/// Overlay items for annotations on `page`, in set order.
pub fn overlay(
    set: &[Annotation],
    page: u32,
    scale: RenderScale,
    selected: Option<AnnotationId>,
) -> Vec<OverlayItem> {
    set.iter()
        .filter(|a| a.page_number == page)
        .map(|a| {
            let state = if selected == Some(a.id) {
                OverlayState::Selected
            } else if a.is_done() {
                OverlayState::Verified
            } else {
                OverlayState::Pending(a.tier())
            };
            let border = if a.is_done() {
                Rgb::EMERALD
            } else {
                a.tier().overlay_color()
            };
            OverlayItem {
                id: a.id,
                rect: map_to_render(&a.bounding_box, scale),
                state,
                border,
                tooltip: format!(
                    "{}: {} ({}%)",
                    labels::display_label(&a.entity_type, &a.entity_label),
                    a.extracted_value,
                    confidence::confidence_percent(a.confidence)
                ),
            }
        })
        .collect()
}

/// A row in the entity verification panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCard {
    pub id: AnnotationId,
    pub label: String,
    pub value: String,
    pub confidence_percent: u8,
    /// Tier badge, only while pending.
    pub badge: Option<ConfidenceTier>,
    /// Attribution, only once verified or corrected.
    pub verified_by: Option<String>,
    pub selected: bool,
    /// Verify button, only while pending.
    pub verify_action: Option<ActionState>,
}

pub fn cards(
    set: &[Annotation],
    selected: Option<AnnotationId>,
    in_flight: &HashSet<AnnotationId>,
) -> Vec<EntityCard> {
    set.iter()
        .map(|a| {
            let value = match a.effective_value() {
                "" => NOT_DETECTED.to_string(),
                v => v.to_string(),
            };
            let (badge, verified_by, verify_action) = match a.status.attribution() {
                Some(attribution) => {
                    let by = match attribution.verified_by.trim() {
                        "" => "User".to_string(),
                        by => by.to_string(),
                    };
                    (None, Some(by), None)
                }
                None => {
                    let verifying = in_flight.contains(&a.id);
                    let action = ActionState {
                        enabled: !verifying,
                        label: (if verifying { "Verifying..." } else { "Verify" }).to_string(),
                    };
                    (Some(a.tier()), None, Some(action))
                }
            };
            EntityCard {
                id: a.id,
                label: labels::display_label(&a.entity_type, &a.entity_label).into_owned(),
                value,
                confidence_percent: confidence::confidence_percent(a.confidence),
                badge,
                verified_by,
                selected: selected == Some(a.id),
                verify_action,
            }
        })
        .collect()
}

/// One of the eight validation entity rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub label: &'static str,
    pub value: String,
    /// Shown only when present and different from the value.
    pub expected: Option<String>,
    pub confidence_percent: u8,
    pub tier: ConfidenceTier,
    pub has_issues: bool,
    pub mismatch: bool,
    pub issues: Vec<String>,
}

impl EntityRow {
    pub fn from_entity(label: &'static str, entity: &ExtractedEntity) -> Self {
        let expected = entity
            .expected_value
            .as_ref()
            .filter(|expected| !expected.is_empty() && **expected != entity.value)
            .cloned();
        Self {
            label,
            value: if entity.value.is_empty() {
                NOT_DETECTED.to_string()
            } else {
                entity.value.clone()
            },
            expected,
            confidence_percent: confidence::confidence_percent(entity.confidence),
            tier: confidence::classify(entity.confidence),
            has_issues: entity.has_issues(),
            mismatch: entity.is_mismatch(),
            issues: entity.issues.clone(),
        }
    }

    pub fn match_label(&self) -> &'static str {
        if self.mismatch { "Review" } else { "Match" }
    }
}
