//! Plain-text rendering of review state for the terminal.
//!
//! Every formatter returns a `String` so the layout can be tested; the
//! `print_*` wrappers write it to stdout.

use std::fmt::Write;

use docverify_review::{ActionState, EntityCard, EntityRow, OverlayItem, OverlayState, Progress, StatusBadge};

// ── Public API ──

pub fn print_overlay(page: u32, items: &[OverlayItem]) {
    print!("{}", format_overlay(page, items));
}

pub fn print_entity_panel(cards: &[EntityCard], progress: Progress, action: &ActionState) {
    print!("{}", format_entity_panel(cards, progress, action));
}

pub fn print_validation(
    badge: StatusBadge,
    overall_percent: u8,
    processing_secs: &str,
    rows: &[EntityRow],
    notes: &Notes<'_>,
) {
    print!(
        "{}",
        format_validation(badge, overall_percent, processing_secs, rows, notes)
    );
}

/// Document-level issue lists shown under the entity rows.
pub struct Notes<'a> {
    pub issues: &'a [String],
    pub warnings: &'a [String],
    pub recommendations: &'a [String],
}

// ── Annotation review ──

pub fn format_overlay(page: u32, items: &[OverlayItem]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Page {page} overlay ({} highlights) ===", items.len());
    for item in items {
        let _ = writeln!(
            out,
            "  #{:<4} {:<16} [{:>7.1}, {:>7.1}, {:>7.1} x {:>6.1}]  {}  {}",
            item.id,
            state_label(item.state),
            item.rect.left,
            item.rect.top,
            item.rect.width,
            item.rect.height,
            item.border.to_hex(),
            item.tooltip,
        );
    }
    out.push('\n');
    out
}

fn state_label(state: OverlayState) -> String {
    match state {
        OverlayState::Selected => "selected".to_string(),
        OverlayState::Verified => "verified".to_string(),
        OverlayState::Pending(tier) => format!("pending/{}", tier.label().to_lowercase()),
    }
}

pub fn format_entity_panel(cards: &[EntityCard], progress: Progress, action: &ActionState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Entities ({}/{} verified, {}%) ===",
        progress.verified, progress.total, progress.percent
    );
    for card in cards {
        let marker = if card.selected { '>' } else { ' ' };
        let status = match (&card.verified_by, card.badge) {
            (Some(by), _) => format!("verified by {by}"),
            (None, Some(tier)) => format!("{} confidence", tier.label()),
            (None, None) => String::new(),
        };
        let _ = writeln!(
            out,
            "{marker} #{:<4} {:<26} {:<40} {:>3}%  {}",
            card.id, card.label, card.value, card.confidence_percent, status
        );
        if let Some(verify) = &card.verify_action {
            let _ = writeln!(out, "         [{}]", button(verify));
        }
    }
    let _ = writeln!(out, "[{}]", button(action));
    out.push('\n');
    out
}

fn button(action: &ActionState) -> String {
    if action.enabled {
        action.label.clone()
    } else {
        format!("{} (disabled)", action.label)
    }
}

// ── Validation result ──

pub fn format_validation(
    badge: StatusBadge,
    overall_percent: u8,
    processing_secs: &str,
    rows: &[EntityRow],
    notes: &Notes<'_>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Validation: {} ({}) ===",
        badge.label,
        badge.color.to_hex()
    );
    let _ = writeln!(
        out,
        "  overall confidence {overall_percent}%, processed in {processing_secs}s"
    );
    out.push('\n');

    for row in rows {
        let _ = writeln!(
            out,
            "  {:<26} {:<40} {:>3}%  {}",
            row.label,
            row.value,
            row.confidence_percent,
            row.match_label()
        );
        if let Some(expected) = &row.expected {
            let _ = writeln!(out, "  {:<26} Expected: {expected}", "");
        }
        for issue in &row.issues {
            let _ = writeln!(out, "  {:<26} ! {issue}", "");
        }
    }

    print_list(&mut out, "Issues", notes.issues);
    print_list(&mut out, "Warnings", notes.warnings);
    print_list(&mut out, "Recommendations", notes.recommendations);
    out.push('\n');
    out
}

fn print_list(out: &mut String, header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{header}");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docverify_core::{ConfidenceTier, ExtractedEntity, RenderRect, Rgb, ValidationStatus};

    fn card(id: u64, verified_by: Option<&str>) -> EntityCard {
        EntityCard {
            id,
            label: "Client Name".into(),
            value: "GLOBAL TRADE SOLUTIONS PTE LTD".into(),
            confidence_percent: 93,
            badge: verified_by.is_none().then_some(ConfidenceTier::High),
            verified_by: verified_by.map(str::to_string),
            selected: id == 1,
            verify_action: verified_by.is_none().then(|| ActionState {
                enabled: true,
                label: "Verify".into(),
            }),
        }
    }

    #[test]
    fn overlay_lists_each_highlight() {
        let items = vec![OverlayItem {
            id: 3,
            rect: RenderRect {
                left: 180.0,
                top: 367.5,
                width: 525.0,
                height: 37.5,
            },
            state: OverlayState::Pending(ConfidenceTier::Medium),
            border: Rgb::AMBER,
            tooltip: "Client Name: ACME (80%)".into(),
        }];
        let out = format_overlay(1, &items);
        assert!(out.starts_with("=== Page 1 overlay (1 highlights) ==="));
        assert!(out.contains("pending/medium"));
        assert!(out.contains("#f59e0b"));
        assert!(out.contains("Client Name: ACME (80%)"));
    }

    #[test]
    fn entity_panel_shows_attribution_and_disabled_approval() {
        let cards = vec![card(1, None), card(2, Some("Demo User"))];
        let progress = Progress {
            verified: 1,
            total: 2,
            percent: 50,
        };
        let action = ActionState {
            enabled: false,
            label: "Verify all entities to approve (1 remaining)".into(),
        };
        let out = format_entity_panel(&cards, progress, &action);
        assert!(out.contains("(1/2 verified, 50%)"));
        assert!(out.contains("> #1"));
        assert!(out.contains("High confidence"));
        assert!(out.contains("verified by Demo User"));
        assert!(out.contains("[Verify]"));
        assert!(out.contains("[Verify all entities to approve (1 remaining) (disabled)]"));
    }

    #[test]
    fn validation_rows_with_expectation_and_lists() {
        let entity = ExtractedEntity {
            value: "Singapore".into(),
            expected_value: Some("Malaysia".into()),
            confidence: 0.81,
            matches_expected: false,
            issues: vec!["Country differs from client record".into()],
        };
        let rows = vec![EntityRow::from_entity("Country of Incorporation", &entity)];
        let warnings = vec!["Signatory not detected".to_string()];
        let notes = Notes {
            issues: &[],
            warnings: &warnings,
            recommendations: &[],
        };
        let out = format_validation(
            StatusBadge::from(ValidationStatus::NeedsReview),
            87,
            "1.50",
            &rows,
            &notes,
        );
        assert!(out.contains("=== Validation: Needs Review"));
        assert!(out.contains("overall confidence 87%, processed in 1.50s"));
        assert!(out.contains("Review"));
        assert!(out.contains("Expected: Malaysia"));
        assert!(out.contains("! Country differs from client record"));
        assert!(out.contains("Warnings\n  - Signatory not detected"));
        assert!(!out.contains("Recommendations"));
    }
}
